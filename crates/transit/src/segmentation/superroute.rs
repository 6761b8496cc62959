//! Keeping superroutes in step with extracted routes.

use std::sync::Arc;

use crate::document::EditSession;
use crate::identifiers::RouteId;
use crate::models::{DocumentStore, Member, RouteSequence};
use crate::segmentation::group::ExtractionGroup;

/// Superroutes that list `id` among their members
pub fn superroute_parents(store: &dyn DocumentStore, id: RouteId) -> Vec<Arc<RouteSequence>> {
    store
        .route_referrers(id)
        .into_iter()
        .filter(|parent| parent.is_superroute())
        .collect()
}

/// Insert `extracted` into every parent right after `original`.
///
/// When the extracted members started the original route the new route is
/// inserted in front of it instead. Parents that already list `extracted`,
/// or no longer list `original`, are left alone. Returns how many parents
/// were changed.
pub fn link_to_superroutes(
    session: &mut EditSession<'_>,
    original: RouteId,
    parents: &[Arc<RouteSequence>],
    first_index: usize,
    extracted: RouteId,
) -> usize {
    let mut linked = 0;

    for parent in parents {
        let Some(mut clone) = session.current(parent.id) else {
            continue;
        };
        if clone.position_of_relation(extracted).is_some() {
            continue;
        }
        let Some(position) = clone.position_of_relation(original) else {
            continue;
        };

        let target = if first_index == 0 { position } else { position + 1 };
        let target = ExtractionGroup::limit_index_to(target, clone.members.len());
        clone.members.insert(target, Member::relation("", extracted));
        log::debug!("Linked route {} into superroute {} at {}", extracted, clone.id, target);

        session.replace(clone);
        linked += 1;
    }

    linked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RouteDocument;
    use crate::fixtures::*;

    fn document() -> RouteDocument {
        RouteDocument::from_data(
            roads(&[1, 2]),
            vec![
                bus_route(10, &[], &[1, 2]),
                bus_route(11, &[], &[2]),
                superroute(20, &[10, 11]),
                superroute(21, &[11, 10]),
            ],
        )
        .unwrap()
    }

    fn relation_ids(route: &RouteSequence) -> Vec<i64> {
        route.members.iter().filter_map(|m| m.relation_id().map(|id| id.get())).collect()
    }

    #[test]
    fn test_parents_are_superroutes() {
        let document = document();
        let parents = superroute_parents(&document, RouteId::new(10));
        let ids: Vec<_> = parents.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![20, 21]);
        assert!(superroute_parents(&document, RouteId::new(20)).is_empty());
    }

    #[test]
    fn test_links_after_original() {
        let document = document();
        let parents = superroute_parents(&document, RouteId::new(10));
        let mut session = EditSession::new(&document);

        let linked = link_to_superroutes(&mut session, RouteId::new(10), &parents, 3, RouteId::new(-1));
        assert_eq!(linked, 2);
        assert_eq!(relation_ids(&session.current(RouteId::new(20)).unwrap()), vec![10, -1, 11]);
        assert_eq!(relation_ids(&session.current(RouteId::new(21)).unwrap()), vec![11, 10, -1]);
    }

    #[test]
    fn test_links_before_original_when_extracted_from_start() {
        let document = document();
        let parents = superroute_parents(&document, RouteId::new(10));
        let mut session = EditSession::new(&document);

        link_to_superroutes(&mut session, RouteId::new(10), &parents, 0, RouteId::new(-1));
        assert_eq!(relation_ids(&session.current(RouteId::new(20)).unwrap()), vec![-1, 10, 11]);
        assert_eq!(relation_ids(&session.current(RouteId::new(21)).unwrap()), vec![11, -1, 10]);
    }

    #[test]
    fn test_does_not_link_twice() {
        let document = document();
        let parents = superroute_parents(&document, RouteId::new(10));
        let mut session = EditSession::new(&document);

        assert_eq!(link_to_superroutes(&mut session, RouteId::new(10), &parents, 1, RouteId::new(11)), 0);
        assert!(session.finish("noop").is_none());
    }
}
