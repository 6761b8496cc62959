//! Route data models, types, and traits.

pub mod classifier;
pub mod tags;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use classifier::TagClassifier;
pub use tags::Tags;
pub use traits::{DirectionCalculator, DocumentStore, RouteClassifier};
pub use types::{
    Direction, Member, MemberRef, Oneway, Result, RouteError, RouteSequence, Segment,
    WayTriplet,
};
