//! # pt-assistant-transit
//!
//! Analysis and editing of public transport route relations.
//!
//! ## Features
//!
//! - **Topology**: Find the neighbours of a way in any route that uses it
//! - **Segmentation**: Split a route into blocks shared by the same lines
//! - **Extraction**: Move members into a new route and keep superroutes in step
//! - **Validation**: Detect routes running against oneway roads
//! - **Undoable edits**: Every change is a transaction that can be reverted
//!
//! ## Example
//!
//! ```
//! use pt_assistant_transit::prelude::*;
//!
//! let segments = vec![
//!     Segment::new(1, Tags::from_iter([("highway", "residential")])),
//!     Segment::new(2, Tags::from_iter([("highway", "residential")])),
//! ];
//! let route = RouteSequence::new(
//!     10,
//!     Tags::from_iter([("type", "route"), ("route", "bus"), ("public_transport:version", "2")]),
//!     vec![Member::node("stop", 100), Member::way("", 1), Member::way("", 2)],
//! );
//! let mut document = RouteDocument::from_data(segments, vec![route])?;
//!
//! // Move the ways into a route of their own
//! let tx = split_in_segments(&document, &TagClassifier, RouteId::new(10), true).unwrap();
//! let mut history = EditHistory::new();
//! history.commit(&mut document, tx)?;
//! assert!(document.route(RouteId::new(10)).unwrap().is_superroute());
//!
//! history.undo(&mut document)?;
//! assert!(!document.route(RouteId::new(10)).unwrap().is_superroute());
//! # Ok::<(), RouteError>(())
//! ```

pub mod document;
pub mod identifiers;
pub mod models;
pub mod segmentation;
pub mod topology;
pub mod validation;

#[cfg(test)]
mod fixtures;

// Re-exports for convenience
pub mod prelude {
    pub use crate::document::{Command, EditHistory, EditSession, RouteDocument, Transaction};
    pub use crate::identifiers::*;
    pub use crate::models::{tags::Tags, traits::*, types::*, TagClassifier};
    pub use crate::segmentation::{
        extract_members, plan_segments, split_in_segments, ExtractOptions, ExtractionGroup,
        RouteSegmenter,
    };
    pub use crate::topology::TopologyLocator;
    pub use crate::validation::{
        DirectionValidator, FixOutcome, IssueCode, Severity, ValidationIssue,
    };
}

pub use prelude::*;
