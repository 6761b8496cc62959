use anyhow::{Context, Result};
use hashbrown::HashSet;
use indicatif::{ProgressBar, ProgressStyle};
use osmpbf::{Element, ElementReader, RelMemberType};
use pt_assistant_transit::{Member, NodeId, RouteSequence, Segment, Tags};
use std::path::Path;

/// Routes and the ways they use, read from a PBF file
pub struct ExtractedRoutes {
    pub routes: Vec<RouteSequence>,
    pub segments: Vec<Segment>,
}

/// Check if a relation is a route or superroute
pub fn is_route_relation(tags: &Tags) -> bool {
    tags.has_tag("type", "route") || tags.has_tag("type", "superroute")
}

fn spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid progress template")?,
    );
    Ok(pb)
}

fn to_member(member_type: &RelMemberType, id: i64, role: &str) -> Member {
    match member_type {
        RelMemberType::Node => Member::node(role, id),
        RelMemberType::Way => Member::way(role, id),
        RelMemberType::Relation => Member::relation(role, id),
    }
}

/// Read route relations, then the ways they reference.
///
/// Relations come after ways in a sorted PBF, so the file is read twice.
pub fn extract_routes(path: &Path) -> Result<ExtractedRoutes> {
    log::info!("Reading PBF file: {}", path.display());

    // First pass: route relations
    let reader = ElementReader::from_path(path)
        .with_context(|| format!("Failed to open PBF file: {}", path.display()))?;
    let pb = spinner()?;
    pb.set_message("Collecting route relations...");

    let mut routes = Vec::new();
    let mut way_ids: HashSet<i64> = HashSet::new();
    let mut relation_count = 0u64;

    reader.for_each(|element| {
        if let Element::Relation(rel) = element {
            relation_count += 1;
            let tags: Tags = rel.tags().collect();
            if !is_route_relation(&tags) {
                return;
            }

            let members: Vec<Member> = rel
                .members()
                .map(|m| to_member(&m.member_type, m.member_id, m.role().unwrap_or("")))
                .collect();
            way_ids.extend(members.iter().filter_map(|m| m.way_id()).map(|id| id.get()));
            routes.push(RouteSequence::new(rel.id(), tags, members));

            if routes.len() % 1_000 == 0 {
                pb.set_message(format!("Found {} routes...", routes.len()));
            }
        }
    })?;

    pb.finish_with_message(format!(
        "Found {} routes in {} relations",
        routes.len(),
        relation_count
    ));

    // Second pass: ways referenced by those routes
    let reader = ElementReader::from_path(path)
        .with_context(|| format!("Failed to reopen PBF file: {}", path.display()))?;
    let pb = spinner()?;
    pb.set_message("Collecting route ways...");

    let mut segments = Vec::with_capacity(way_ids.len());
    reader.for_each(|element| {
        if let Element::Way(way) = element {
            if !way_ids.contains(&way.id()) {
                return;
            }
            let mut segment = Segment::new(way.id(), way.tags().collect());
            segment.nodes = way.refs().map(NodeId::new).collect();
            segments.push(segment);

            if segments.len() % 100_000 == 0 {
                pb.set_message(format!("Collected {} ways...", segments.len()));
            }
        }
    })?;

    pb.finish_with_message(format!("Collected {} of {} ways", segments.len(), way_ids.len()));

    if segments.len() < way_ids.len() {
        log::warn!(
            "{} ways referenced by routes are missing from the file",
            way_ids.len() - segments.len()
        );
    }
    log::info!("Routes: {}", routes.len());
    log::info!("Ways: {}", segments.len());

    Ok(ExtractedRoutes { routes, segments })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_route_relation() {
        assert!(is_route_relation(&Tags::from_iter([("type", "route")])));
        assert!(is_route_relation(&Tags::from_iter([("type", "superroute")])));
        assert!(!is_route_relation(&Tags::from_iter([("type", "multipolygon")])));
        assert!(!is_route_relation(&Tags::new()));
    }

    #[test]
    fn test_to_member() {
        assert_eq!(to_member(&RelMemberType::Way, 5, "forward"), Member::way("forward", 5));
        assert_eq!(to_member(&RelMemberType::Node, 7, "stop"), Member::node("stop", 7));
        assert_eq!(to_member(&RelMemberType::Relation, 9, ""), Member::relation("", 9));
    }
}
