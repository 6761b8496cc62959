//! In-memory document of segments and route relations.
//!
//! Stores everything behind `Arc`s with lookup maps, reverse referrer
//! indices and a content index used to find identical routes.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use twox_hash::XxHash64;

use crate::document::transaction::{Command, Transaction};
use crate::identifiers::*;
use crate::models::{traits::*, types::*, Tags};

/// Hash of a route's content, independent of its id
pub fn content_hash(members: &[Member], tags: &Tags) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    members.hash(&mut hasher);
    tags.hash(&mut hasher);
    hasher.finish()
}

/// In-memory document store
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone, Default)]
pub struct RouteDocument {
    // Core data
    segments: HashMap<SegmentId, Arc<Segment>>,
    routes: BTreeMap<RouteId, Arc<RouteSequence>>,

    // Reverse lookups
    segment_referrers: HashMap<SegmentId, BTreeSet<RouteId>>,
    route_referrers: HashMap<RouteId, BTreeSet<RouteId>>,
    content_index: HashMap<u64, Vec<RouteId>>,
}

impl RouteDocument {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from raw data
    pub fn from_data(segments: Vec<Segment>, routes: Vec<RouteSequence>) -> Result<Self> {
        let mut document = Self::new();

        for segment in segments {
            if document.segments.contains_key(&segment.id) {
                return Err(RouteError::DuplicateSegment(segment.id));
            }
            document.segments.insert(segment.id, Arc::new(segment));
        }

        for route in routes {
            if document.routes.contains_key(&route.id) {
                return Err(RouteError::DuplicateRoute(route.id));
            }
            document.insert_route(Arc::new(route));
        }

        log::debug!(
            "Document loaded: {} segments, {} routes",
            document.segments.len(),
            document.routes.len()
        );

        Ok(document)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Arc<Segment>> {
        self.segments.values()
    }

    /// Apply all commands of a transaction, or none of them
    pub fn apply(&mut self, transaction: &Transaction) -> Result<()> {
        self.check(transaction)?;

        for command in &transaction.commands {
            match command {
                Command::Add { route } => self.insert_route(route.clone()),
                Command::Replace { after, .. } => {
                    self.remove_route(after.id);
                    self.insert_route(after.clone());
                }
                Command::Remove { route } => {
                    self.remove_route(route.id);
                }
            }
        }

        log::debug!(
            "Applied '{}' ({} commands)",
            transaction.label,
            transaction.len()
        );
        Ok(())
    }

    /// Validate a transaction against the current state without touching it
    fn check(&self, transaction: &Transaction) -> Result<()> {
        // State of every touched route after the commands seen so far
        let mut pending: HashMap<RouteId, Option<&RouteSequence>> = HashMap::new();

        for command in &transaction.commands {
            let id = command.route_id();
            let current = match pending.get(&id) {
                Some(state) => *state,
                None => self.routes.get(&id).map(|r| r.as_ref()),
            };

            match command {
                Command::Add { route } => {
                    if current.is_some() {
                        return Err(RouteError::DuplicateRoute(id));
                    }
                    pending.insert(id, Some(route.as_ref()));
                }
                Command::Replace { before, after } => {
                    if before.id != after.id {
                        return Err(RouteError::InvalidData(format!(
                            "Replacement of route {} carries id {}",
                            before.id, after.id
                        )));
                    }
                    match current {
                        None => return Err(RouteError::RouteNotFound(id)),
                        Some(stored) if stored != before.as_ref() => {
                            return Err(RouteError::StaleRoute(id));
                        }
                        Some(_) => {}
                    }
                    pending.insert(id, Some(after.as_ref()));
                }
                Command::Remove { route } => {
                    match current {
                        None => return Err(RouteError::RouteNotFound(id)),
                        Some(stored) if stored != route.as_ref() => {
                            return Err(RouteError::StaleRoute(id));
                        }
                        Some(_) => {}
                    }
                    pending.insert(id, None);
                }
            }
        }

        Ok(())
    }

    fn insert_route(&mut self, route: Arc<RouteSequence>) {
        let id = route.id;
        for member in &route.members {
            match member.target {
                MemberRef::Way(way) => {
                    self.segment_referrers.entry(way).or_default().insert(id);
                }
                MemberRef::Relation(child) => {
                    self.route_referrers.entry(child).or_default().insert(id);
                }
                MemberRef::Node(_) => {}
            }
        }
        self.content_index
            .entry(content_hash(&route.members, &route.tags))
            .or_default()
            .push(id);
        self.routes.insert(id, route);
    }

    fn remove_route(&mut self, id: RouteId) -> Option<Arc<RouteSequence>> {
        let route = self.routes.remove(&id)?;
        for member in &route.members {
            match member.target {
                MemberRef::Way(way) => {
                    if let Some(referrers) = self.segment_referrers.get_mut(&way) {
                        referrers.remove(&id);
                    }
                }
                MemberRef::Relation(child) => {
                    if let Some(referrers) = self.route_referrers.get_mut(&child) {
                        referrers.remove(&id);
                    }
                }
                MemberRef::Node(_) => {}
            }
        }
        let hash = content_hash(&route.members, &route.tags);
        if let Some(ids) = self.content_index.get_mut(&hash) {
            ids.retain(|other| *other != id);
        }
        Some(route)
    }

    fn collect(&self, ids: Option<&BTreeSet<RouteId>>) -> Vec<Arc<RouteSequence>> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.routes.get(id).cloned())
            .collect()
    }
}

impl DocumentStore for RouteDocument {
    fn route(&self, id: RouteId) -> Option<Arc<RouteSequence>> {
        self.routes.get(&id).cloned()
    }

    fn segment(&self, id: SegmentId) -> Option<Arc<Segment>> {
        self.segments.get(&id).cloned()
    }

    fn routes(&self) -> Vec<Arc<RouteSequence>> {
        self.routes.values().cloned().collect()
    }

    fn segment_referrers(&self, id: SegmentId) -> Vec<Arc<RouteSequence>> {
        self.collect(self.segment_referrers.get(&id))
    }

    fn route_referrers(&self, id: RouteId) -> Vec<Arc<RouteSequence>> {
        self.collect(self.route_referrers.get(&id))
    }

    fn find_identical(&self, members: &[Member], tags: &Tags, exclude: Option<RouteId>) -> Option<RouteId> {
        self.content_index
            .get(&content_hash(members, tags))?
            .iter()
            .filter(|id| Some(**id) != exclude)
            .filter_map(|id| self.routes.get(id))
            .find(|route| route.members == members && &route.tags == tags)
            .map(|route| route.id)
    }

    fn lowest_id(&self) -> i64 {
        self.routes.keys().next().map(|id| id.get()).unwrap_or(0)
    }
}
