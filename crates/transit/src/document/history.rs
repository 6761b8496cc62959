//! Undo/redo log of applied transactions.

use crate::document::store::RouteDocument;
use crate::document::transaction::Transaction;
use crate::models::types::{Result, RouteError};

/// Applies transactions to a document and remembers them for undo/redo
pub struct EditHistory {
    undo_stack: Vec<Transaction>,
    redo_stack: Vec<Transaction>,
    max_depth: usize,
}

impl EditHistory {
    const DEFAULT_DEPTH: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_DEPTH)
    }

    /// History keeping at most `max_depth` undo steps
    pub fn with_capacity(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::with_capacity(max_depth),
            max_depth: max_depth.max(1),
        }
    }

    /// Apply a transaction and make it undoable. Clears the redo stack.
    pub fn commit(&mut self, document: &mut RouteDocument, transaction: Transaction) -> Result<()> {
        document.apply(&transaction)?;
        log::info!("{}", transaction.label);
        Self::push_bounded(&mut self.undo_stack, transaction, self.max_depth);
        self.redo_stack.clear();
        Ok(())
    }

    /// Revert the latest transaction, returning its label
    pub fn undo(&mut self, document: &mut RouteDocument) -> Result<String> {
        let transaction = self.undo_stack.pop().ok_or(RouteError::NothingToUndo)?;
        if let Err(e) = document.apply(&transaction.inverse()) {
            self.undo_stack.push(transaction);
            return Err(e);
        }
        let label = transaction.label.clone();
        Self::push_bounded(&mut self.redo_stack, transaction, self.max_depth);
        Ok(label)
    }

    /// Re-apply the latest undone transaction, returning its label
    pub fn redo(&mut self, document: &mut RouteDocument) -> Result<String> {
        let transaction = self.redo_stack.pop().ok_or(RouteError::NothingToRedo)?;
        if let Err(e) = document.apply(&transaction) {
            self.redo_stack.push(transaction);
            return Err(e);
        }
        let label = transaction.label.clone();
        Self::push_bounded(&mut self.undo_stack, transaction, self.max_depth);
        Ok(label)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Applied transactions, oldest first
    pub fn entries(&self) -> &[Transaction] {
        &self.undo_stack
    }

    fn push_bounded(stack: &mut Vec<Transaction>, transaction: Transaction, max_depth: usize) {
        if stack.len() >= max_depth {
            stack.remove(0);
        }
        stack.push(transaction);
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EditSession;
    use crate::fixtures::*;
    use crate::identifiers::RouteId;
    use crate::models::DocumentStore;

    fn rename(document: &RouteDocument, name: &str) -> Transaction {
        let mut session = EditSession::new(document);
        let mut route = session.current(RouteId::new(10)).unwrap();
        route.put("name", name);
        session.replace(route);
        session.finish("rename").unwrap()
    }

    fn name_of(document: &RouteDocument) -> Option<String> {
        document
            .route(RouteId::new(10))
            .and_then(|r| r.get("name").map(str::to_string))
    }

    #[test]
    fn test_empty_history_cannot_undo_or_redo() {
        let mut document = RouteDocument::new();
        let mut history = EditHistory::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(matches!(history.undo(&mut document), Err(RouteError::NothingToUndo)));
        assert!(matches!(history.redo(&mut document), Err(RouteError::NothingToRedo)));
    }

    #[test]
    fn test_undo_and_redo() {
        let mut document = RouteDocument::from_data(roads(&[1]), vec![bus_route(10, &[], &[1])]).unwrap();
        let mut history = EditHistory::new();

        let tx = rename(&document, "Line 1");
        history.commit(&mut document, tx).unwrap();
        assert_eq!(name_of(&document).as_deref(), Some("Line 1"));

        assert_eq!(history.undo(&mut document).unwrap(), "rename");
        assert_eq!(name_of(&document), None);
        assert!(history.can_redo());

        history.redo(&mut document).unwrap();
        assert_eq!(name_of(&document).as_deref(), Some("Line 1"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_commit_clears_redo_stack() {
        let mut document = RouteDocument::from_data(roads(&[1]), vec![bus_route(10, &[], &[1])]).unwrap();
        let mut history = EditHistory::new();

        let tx = rename(&document, "a");
        history.commit(&mut document, tx).unwrap();
        history.undo(&mut document).unwrap();
        assert!(history.can_redo());

        let tx = rename(&document, "b");
        history.commit(&mut document, tx).unwrap();
        assert!(!history.can_redo());
    }

    #[test]
    fn test_respects_max_depth() {
        let mut document = RouteDocument::from_data(roads(&[1]), vec![bus_route(10, &[], &[1])]).unwrap();
        let mut history = EditHistory::with_capacity(2);

        for name in ["a", "b", "c"] {
            let tx = rename(&document, name);
            history.commit(&mut document, tx).unwrap();
        }

        assert_eq!(history.entries().len(), 2);
        history.undo(&mut document).unwrap();
        history.undo(&mut document).unwrap();
        assert!(!history.can_undo());
        assert_eq!(name_of(&document).as_deref(), Some("a"));
    }

    #[test]
    fn test_failed_commit_keeps_history() {
        let mut document = RouteDocument::from_data(roads(&[1]), vec![bus_route(10, &[], &[1])]).unwrap();
        let mut history = EditHistory::new();

        let stale = rename(&document, "a");
        let tx = rename(&document, "b");
        history.commit(&mut document, tx).unwrap();

        assert!(history.commit(&mut document, stale).is_err());
        assert_eq!(history.entries().len(), 1);
        assert_eq!(name_of(&document).as_deref(), Some("b"));
    }
}
