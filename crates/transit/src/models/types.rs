//! Core data types and enums for route relations.

use strum::{Display, EnumString, IntoStaticStr};

use crate::identifiers::*;
use crate::models::tags::Tags;

// ============================================================================
// Enums
// ============================================================================

/// Oneway restriction of a segment, read from its `oneway` tag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Oneway {
    #[default]
    None,
    Forward,
    Backward,
}

impl Oneway {
    pub fn from_tag(value: Option<&str>) -> Self {
        match value {
            Some("yes" | "true" | "1") => Self::Forward,
            Some("-1" | "reverse") => Self::Backward,
            _ => Self::None,
        }
    }
}

/// Traversal direction of a segment relative to its neighbours in a route
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Direction {
    Forward,
    Backward,
    RoundaboutLeft,
    RoundaboutRight,
    Unknown,
}

impl Direction {
    pub fn is_roundabout(&self) -> bool {
        matches!(self, Self::RoundaboutLeft | Self::RoundaboutRight)
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A way: one directed-or-undirected path edge
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub id: SegmentId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
    /// Ordered node ids, only consumed by direction calculators
    #[cfg_attr(feature = "serde", serde(default))]
    pub nodes: Vec<NodeId>,
}

impl Segment {
    pub fn new(id: impl Into<SegmentId>, tags: Tags) -> Self {
        Self {
            id: id.into(),
            tags,
            nodes: Vec::new(),
        }
    }

    pub fn oneway(&self) -> Oneway {
        Oneway::from_tag(self.tags.get("oneway"))
    }

    /// Buses may use this segment against its oneway direction
    pub fn has_bus_exception(&self) -> bool {
        self.tags.has_tag("busway", "lane")
            || self.tags.has_tag("busway", "opposite_lane")
            || self.tags.has_tag("oneway:bus", "no")
    }
}

/// What a relation member points at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "ref", rename_all = "lowercase"))]
pub enum MemberRef {
    Node(NodeId),
    Way(SegmentId),
    Relation(RouteId),
}

/// A typed, ordered reference inside a route relation
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub target: MemberRef,
}

impl Member {
    pub fn new(role: impl Into<String>, target: MemberRef) -> Self {
        Self {
            role: role.into(),
            target,
        }
    }

    pub fn node(role: impl Into<String>, id: impl Into<NodeId>) -> Self {
        Self::new(role, MemberRef::Node(id.into()))
    }

    pub fn way(role: impl Into<String>, id: impl Into<SegmentId>) -> Self {
        Self::new(role, MemberRef::Way(id.into()))
    }

    pub fn relation(role: impl Into<String>, id: impl Into<RouteId>) -> Self {
        Self::new(role, MemberRef::Relation(id.into()))
    }

    pub fn is_way(&self) -> bool {
        matches!(self.target, MemberRef::Way(_))
    }

    pub fn way_id(&self) -> Option<SegmentId> {
        match self.target {
            MemberRef::Way(id) => Some(id),
            _ => None,
        }
    }

    pub fn relation_id(&self) -> Option<RouteId> {
        match self.target {
            MemberRef::Relation(id) => Some(id),
            _ => None,
        }
    }

    /// Same target with a different role
    pub fn with_role(&self, role: impl Into<String>) -> Self {
        Self::new(role, self.target)
    }
}

/// A route or superroute relation: ordered members plus tags
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSequence {
    pub id: RouteId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
}

impl RouteSequence {
    pub fn new(id: impl Into<RouteId>, tags: Tags, members: Vec<Member>) -> Self {
        Self {
            id: id.into(),
            tags,
            members,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key)
    }

    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tags.has_tag(key, value)
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.put(key, value);
    }

    /// Value of the `type` tag
    pub fn route_type(&self) -> Option<&str> {
        self.tags.get("type")
    }

    pub fn is_superroute(&self) -> bool {
        self.has_tag("type", "superroute")
    }

    pub fn references_way(&self, id: SegmentId) -> bool {
        self.members.iter().any(|m| m.way_id() == Some(id))
    }

    /// Index of the first member pointing at relation `id`
    pub fn position_of_relation(&self, id: RouteId) -> Option<usize> {
        self.members.iter().position(|m| m.relation_id() == Some(id))
    }
}

/// Neighbours of one occurrence of a segment inside a route
///
/// `previous` and `next` are absent at the ends of the route's way list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WayTriplet {
    pub previous: Option<SegmentId>,
    pub current: SegmentId,
    pub next: Option<SegmentId>,
}

impl WayTriplet {
    pub fn new(previous: Option<SegmentId>, current: SegmentId, next: Option<SegmentId>) -> Self {
        Self {
            previous,
            current,
            next,
        }
    }

    /// `current` is the first or last way of the route
    pub fn is_terminal(&self) -> bool {
        self.previous.is_none() || self.next.is_none()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Route not found: {0}")]
    RouteNotFound(RouteId),

    #[error("Duplicate route id: {0}")]
    DuplicateRoute(RouteId),

    #[error("Duplicate segment id: {0}")]
    DuplicateSegment(SegmentId),

    #[error("Route {0} was modified since the edit was prepared")]
    StaleRoute(RouteId),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, RouteError>;
