//! Finds the neighbours of a segment inside a route.
//!
//! Only the driving ways of a route count; stops, platforms and anything
//! else the classifier rejects are skipped, so the neighbours of a way are
//! the closest driving ways on either side of it.

use std::sync::Arc;

use crate::identifiers::SegmentId;
use crate::models::{DocumentStore, Member, RouteClassifier, RouteSequence, Segment, WayTriplet};

#[derive(Clone, Copy)]
pub struct TopologyLocator<'a> {
    store: &'a dyn DocumentStore,
    classifier: &'a dyn RouteClassifier,
}

impl<'a> TopologyLocator<'a> {
    pub fn new(store: &'a dyn DocumentStore, classifier: &'a dyn RouteClassifier) -> Self {
        Self { store, classifier }
    }

    pub fn store(&self) -> &'a dyn DocumentStore {
        self.store
    }

    pub fn classifier(&self) -> &'a dyn RouteClassifier {
        self.classifier
    }

    /// Way id of the member if it is a driving way
    pub fn path_way(&self, member: &Member) -> Option<SegmentId> {
        let id = member.way_id()?;
        let segment = self.store.segment(id);
        self.classifier
            .is_pt_way(member, segment.as_deref())
            .then_some(id)
    }

    /// Driving-way members of a route with their segments, in route order
    pub fn path_members<'r>(&self, route: &'r RouteSequence) -> Vec<(&'r Member, Arc<Segment>)> {
        route
            .members
            .iter()
            .filter_map(|member| {
                let segment = self.store.segment(member.way_id()?)?;
                self.classifier
                    .is_pt_way(member, Some(segment.as_ref()))
                    .then_some((member, segment))
            })
            .collect()
    }

    /// One triplet per occurrence of `target` in `route`, in route order
    ///
    /// A way directly preceded by itself reports no previous way. Returns an
    /// empty list when the route does not contain `target`.
    pub fn locate(&self, route: &RouteSequence, target: SegmentId) -> Vec<WayTriplet> {
        let mut triplets = Vec::new();
        // Way to the right of the one being looked at
        let mut next: Option<SegmentId> = None;
        // Occurrence of `target` still waiting for its previous way
        let mut pending: Option<Option<SegmentId>> = None;

        for way in route.members.iter().rev().filter_map(|m| self.path_way(m)) {
            if let Some(after) = pending.take() {
                let previous = (way != target).then_some(way);
                triplets.push(WayTriplet::new(previous, target, after));
            }
            if way == target {
                pending = Some(next);
            }
            next = Some(way);
        }

        if let Some(after) = pending {
            triplets.push(WayTriplet::new(None, target, after));
        }

        triplets.reverse();
        triplets
    }

    /// Next way after the first occurrence of `target`
    pub fn first_next(&self, route: &RouteSequence, target: SegmentId) -> Option<SegmentId> {
        self.locate(route, target).first().and_then(|t| t.next)
    }
}
