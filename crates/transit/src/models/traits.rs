//! Core traits for the collaborators the analyses depend on.
//!
//! These traits define the read access, tag predicates and direction facts
//! the core consumes. Implementations can be in-memory, editor-backed, or
//! remote.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::tags::Tags;
use crate::models::types::*;

// ============================================================================
// Document Access
// ============================================================================

/// Read access to routes and segments of one document
pub trait DocumentStore {
    // ---- Lookups ----
    fn route(&self, id: RouteId) -> Option<Arc<RouteSequence>>;
    fn segment(&self, id: SegmentId) -> Option<Arc<Segment>>;

    // ---- Collections ----
    fn routes(&self) -> Vec<Arc<RouteSequence>>;

    // ---- Reverse lookups ----

    /// All routes that reference the segment, in ascending id order
    fn segment_referrers(&self, id: SegmentId) -> Vec<Arc<RouteSequence>>;

    /// All routes (usually superroutes) that reference the route
    fn route_referrers(&self, id: RouteId) -> Vec<Arc<RouteSequence>>;

    /// An existing route other than `exclude` with exactly these members
    /// (same order) and tags
    fn find_identical(&self, members: &[Member], tags: &Tags, exclude: Option<RouteId>) -> Option<RouteId>;

    /// Smallest id in use, used to hand out provisional ids below it
    fn lowest_id(&self) -> i64;
}

// ============================================================================
// Classification
// ============================================================================

/// Tag-based predicates over routes and members
pub trait RouteClassifier {
    /// Public transport route following the version 2 tagging scheme
    fn is_version_two_pt_route(&self, route: &RouteSequence) -> bool;

    /// Route whose itinerary is checked against oneway restrictions
    fn is_two_direction_route(&self, route: &RouteSequence) -> bool;

    /// Member is a way the vehicle drives on
    fn is_pt_way(&self, member: &Member, segment: Option<&Segment>) -> bool;

    /// Member is a stop or platform
    fn is_pt_stop(&self, member: &Member) -> bool;
}

// ============================================================================
// Direction Facts
// ============================================================================

/// Computes how each way of a route is traversed relative to its neighbours
///
/// Must return one entry per input segment, based on the shared endpoints of
/// consecutive segments.
pub trait DirectionCalculator {
    fn compute_directions(&self, route: &RouteSequence, segments: &[Arc<Segment>]) -> Vec<Direction>;
}
