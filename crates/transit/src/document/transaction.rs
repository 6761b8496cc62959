//! Replace-commands and the transactions that group them.

use std::sync::Arc;

use crate::identifiers::RouteId;
use crate::models::types::RouteSequence;

/// One change to a document
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a route that does not exist yet
    Add { route: Arc<RouteSequence> },
    /// Swap a stored route for a modified clone of it
    Replace {
        before: Arc<RouteSequence>,
        after: Arc<RouteSequence>,
    },
    /// Drop a route; only produced when undoing an `Add`
    Remove { route: Arc<RouteSequence> },
}

impl Command {
    pub fn route_id(&self) -> RouteId {
        match self {
            Self::Add { route } | Self::Remove { route } => route.id,
            Self::Replace { after, .. } => after.id,
        }
    }

    pub fn inverse(&self) -> Self {
        match self {
            Self::Add { route } => Self::Remove {
                route: route.clone(),
            },
            Self::Remove { route } => Self::Add {
                route: route.clone(),
            },
            Self::Replace { before, after } => Self::Replace {
                before: after.clone(),
                after: before.clone(),
            },
        }
    }
}

/// Commands applied as one undoable unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub label: String,
    pub commands: Vec<Command>,
}

impl Transaction {
    pub fn new(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            label: label.into(),
            commands,
        }
    }

    /// Undoes this transaction when applied after it
    pub fn inverse(&self) -> Self {
        Self {
            label: self.label.clone(),
            commands: self.commands.iter().rev().map(Command::inverse).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Routes created by this transaction
    pub fn added_routes(&self) -> impl Iterator<Item = &Arc<RouteSequence>> {
        self.commands.iter().filter_map(|c| match c {
            Command::Add { route } => Some(route),
            _ => None,
        })
    }

    /// New versions of the routes this transaction replaces
    pub fn replaced_routes(&self) -> impl Iterator<Item = &Arc<RouteSequence>> {
        self.commands.iter().filter_map(|c| match c {
            Command::Replace { after, .. } => Some(after),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, Tags};

    fn route(id: i64, ways: &[i64]) -> Arc<RouteSequence> {
        Arc::new(RouteSequence::new(
            id,
            Tags::new(),
            ways.iter().map(|&w| Member::way("", w)).collect(),
        ))
    }

    #[test]
    fn test_inverse_reverses_order() {
        let tx = Transaction::new(
            "test",
            vec![
                Command::Replace {
                    before: route(1, &[1, 2]),
                    after: route(1, &[1]),
                },
                Command::Add {
                    route: route(-1, &[2]),
                },
            ],
        );

        let inverse = tx.inverse();
        assert_eq!(inverse.len(), 2);
        assert_eq!(inverse.commands[0], Command::Remove { route: route(-1, &[2]) });
        assert_eq!(
            inverse.commands[1],
            Command::Replace {
                before: route(1, &[1]),
                after: route(1, &[1, 2]),
            }
        );
        assert_eq!(inverse.inverse(), tx);
    }

    #[test]
    fn test_added_and_replaced() {
        let tx = Transaction::new(
            "test",
            vec![
                Command::Add { route: route(-1, &[]) },
                Command::Replace {
                    before: route(1, &[1]),
                    after: route(1, &[]),
                },
            ],
        );
        assert_eq!(tx.added_routes().count(), 1);
        assert_eq!(tx.replaced_routes().next().map(|r| r.id), Some(RouteId::new(1)));
    }
}
