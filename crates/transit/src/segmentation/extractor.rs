//! Moves a block of members into a route of its own.

use crate::document::{EditSession, Transaction};
use crate::identifiers::RouteId;
use crate::models::{DocumentStore, Member, RouteSequence, Tags};
use crate::segmentation::group::ExtractionGroup;
use crate::segmentation::superroute::{link_to_superroutes, superroute_parents};

/// Tags copied from the source when extracting a hand-picked selection
pub const EXTRACT_CARRIED_TAGS: &[&str] = &["type", "route", "cycle_network", "network", "operator", "ref"];

pub const EXTRACT_LABEL: &str = "Extract ways to relation";

/// What the user chose when extracting a selection
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Name of the new route, defaults to the source's name
    pub name: Option<String>,
    /// The new route is a proposed line (cycle highways)
    pub proposed: bool,
    /// The new route is a deviation (cycle highways)
    pub deviation: bool,
    /// Turn the source into a superroute when a new route was created
    pub convert_to_superroute: bool,
    /// Also insert the new route into the superroutes of the source
    pub link_superroutes: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            name: None,
            proposed: false,
            deviation: false,
            convert_to_superroute: false,
            link_superroutes: true,
        }
    }
}

impl ExtractionGroup {
    /// Materialise the group as a route.
    ///
    /// Reuses another route with identical members and tags when one exists,
    /// otherwise stages a new one under a provisional id. `source` itself is
    /// never reused. With `substitute`
    /// the selected members of `source` are replaced, at the position of the
    /// first of them, by a single member pointing at the extracted route.
    /// Returns `None` when no index of the group falls inside `source`.
    pub fn extract_to_relation(
        &self,
        session: &mut EditSession<'_>,
        source: &mut RouteSequence,
        carried_tags: &[&str],
        substitute: bool,
    ) -> Option<RouteId> {
        let indices: Vec<usize> = self
            .sorted_indices()
            .into_iter()
            .filter(|&i| i < source.members.len())
            .collect();
        let first = *indices.first()?;

        let members: Vec<Member> = indices.iter().map(|&i| source.members[i].clone()).collect();
        let tags = self.extracted_tags(session, source, &members, carried_tags);

        let extracted = match session.find_identical(&members, &tags, Some(source.id)) {
            Some(existing) => {
                log::debug!("Reusing route {} for members {:?} of {}", existing, indices, source.id);
                existing
            }
            None => {
                let id = session.allocate_id();
                log::debug!("New route {} from members {:?} of {}", id, indices, source.id);
                session.add(RouteSequence::new(id, tags, members));
                id
            }
        };

        if substitute {
            for &i in indices.iter().rev() {
                source.members.remove(i);
            }
            source.members.insert(first, Member::relation("", extracted));
        }

        Some(extracted)
    }

    fn extracted_tags(
        &self,
        session: &EditSession<'_>,
        source: &RouteSequence,
        members: &[Member],
        carried_tags: &[&str],
    ) -> Tags {
        let mut tags = Tags::new();
        for key in carried_tags {
            if let Some(value) = source.get(key) {
                tags.put(*key, value);
            }
        }
        if let Some(route_ref) = self.route_ref_signature() {
            tags.put("route_ref", route_ref);
        }
        if let Some(colour) = self.colour_signature() {
            tags.put("colour", colour);
        }
        if !self.overrides().contains_key("name") {
            if let Some(name) = street_names(session.store(), members) {
                tags.put("name", name);
            }
        }
        for (key, value) in self.overrides().iter() {
            tags.put(key, value);
        }
        tags
    }
}

/// "First street - last street" from the `name` tags of the member ways
fn street_names(store: &dyn DocumentStore, members: &[Member]) -> Option<String> {
    let mut names = members
        .iter()
        .filter_map(Member::way_id)
        .filter_map(|id| store.segment(id))
        .filter_map(|segment| segment.tags.get("name").map(str::to_string));

    let first = names.next()?;
    match names.last() {
        Some(last) if last != first => Some(format!("{} - {}", first, last)),
        _ => Some(first),
    }
}

/// Move the members at `indices` of a route into a new route.
///
/// Returns the transaction that replaces the route, adds the extracted route
/// and links it into the route's superroutes, or `None` when there is
/// nothing to extract.
pub fn extract_members(
    store: &dyn DocumentStore,
    route_id: RouteId,
    indices: &[usize],
    options: &ExtractOptions,
) -> Option<Transaction> {
    let Some(original) = store.route(route_id) else {
        log::warn!("Route {} not found, nothing to extract", route_id);
        return None;
    };

    let mut group = ExtractionGroup::with_indices(indices.iter().copied());
    let name = options
        .name
        .clone()
        .or_else(|| original.get("name").map(str::to_string))
        .filter(|n| !n.is_empty());
    if let Some(name) = name {
        group.put("name", name.as_str());
        if options.proposed {
            group.put("state", "proposed");
            group.put("name", format!("{} (wenslijn)", name));
        }
        if options.deviation {
            group.put("name", format!("{} (omleiding)", name));
        }
    } else if options.proposed {
        group.put("state", "proposed");
    }

    let mut session = EditSession::new(store);
    let mut clone = original.as_ref().clone();
    let extracted = group.extract_to_relation(&mut session, &mut clone, EXTRACT_CARRIED_TAGS, true)?;

    if options.convert_to_superroute && store.route(extracted).is_none() {
        clone.put("type", "superroute");
    }
    session.replace(clone);

    if options.link_superroutes {
        let parents = superroute_parents(store, route_id);
        let first = group.first_index().unwrap_or(0);
        link_to_superroutes(&mut session, route_id, &parents, first, extracted);
    }

    session.finish(EXTRACT_LABEL)
}
