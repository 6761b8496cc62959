//! Route validators.

pub mod direction;

pub use direction::{DirectionValidator, FixOutcome, IssueCode, Severity, ValidationIssue};
