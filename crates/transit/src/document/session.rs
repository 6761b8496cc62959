//! Staging area for clone-then-replace edits.
//!
//! A session reads a [`DocumentStore`] without modifying it. Routes are
//! cloned, changed and staged; [`EditSession::finish`] turns everything
//! staged into one [`Transaction`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::document::transaction::{Command, Transaction};
use crate::identifiers::RouteId;
use crate::models::{DocumentStore, Member, RouteSequence, Tags};

pub struct EditSession<'a> {
    store: &'a dyn DocumentStore,
    staged: HashMap<RouteId, RouteSequence>,
    /// Staged ids in first-touch order
    order: Vec<RouteId>,
    next_id: i64,
}

impl<'a> EditSession<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            staged: HashMap::new(),
            order: Vec::new(),
            next_id: store.lowest_id().min(0) - 1,
        }
    }

    pub fn store(&self) -> &'a dyn DocumentStore {
        self.store
    }

    /// Latest version of a route: staged if touched, stored otherwise
    pub fn current(&self, id: RouteId) -> Option<RouteSequence> {
        match self.staged.get(&id) {
            Some(route) => Some(route.clone()),
            None => self.store.route(id).map(|r| r.as_ref().clone()),
        }
    }

    /// Stage a new version of an existing or staged route
    pub fn replace(&mut self, route: RouteSequence) {
        self.stage(route);
    }

    /// Stage a route that does not exist in the store
    pub fn add(&mut self, route: RouteSequence) {
        debug_assert!(self.store.route(route.id).is_none());
        self.stage(route);
    }

    fn stage(&mut self, route: RouteSequence) {
        if !self.staged.contains_key(&route.id) {
            self.order.push(route.id);
        }
        self.staged.insert(route.id, route);
    }

    /// Hand out a provisional id no stored or staged route uses
    pub fn allocate_id(&mut self) -> RouteId {
        let id = RouteId::new(self.next_id);
        self.next_id -= 1;
        id
    }

    /// A stored or staged route other than `exclude` with exactly this content
    pub fn find_identical(&self, members: &[Member], tags: &Tags, exclude: Option<RouteId>) -> Option<RouteId> {
        let is_match = |route: &RouteSequence| route.members == members && &route.tags == tags;

        if let Some(id) = self
            .order
            .iter()
            .filter(|id| Some(**id) != exclude)
            .find(|id| self.staged.get(*id).is_some_and(is_match))
        {
            return Some(*id);
        }

        // The stored copy only counts if the session did not change it since
        self.store
            .find_identical(members, tags, exclude)
            .filter(|id| !self.staged.contains_key(id))
    }

    /// Turn the staged routes into one transaction
    ///
    /// Returns `None` when nothing changed.
    pub fn finish(mut self, label: &str) -> Option<Transaction> {
        let mut commands = Vec::with_capacity(self.order.len());

        for id in &self.order {
            let Some(after) = self.staged.remove(id) else {
                continue;
            };
            match self.store.route(*id) {
                Some(before) if before.as_ref() == &after => {}
                Some(before) => commands.push(Command::Replace {
                    before,
                    after: Arc::new(after),
                }),
                None => commands.push(Command::Add {
                    route: Arc::new(after),
                }),
            }
        }

        if commands.is_empty() {
            log::debug!("'{}' produced no changes", label);
            return None;
        }

        Some(Transaction::new(label, commands))
    }
}
