//! Default tag-based route classifier.

use crate::models::traits::RouteClassifier;
use crate::models::types::{Member, RouteSequence, Segment};

/// `route=*` values of public transport routes
const PT_ROUTE_TYPES: &[&str] = &[
    "bus",
    "trolleybus",
    "share_taxi",
    "coach",
    "minibus",
    "train",
    "light_rail",
    "subway",
    "tram",
    "monorail",
    "ferry",
];

/// Classifies routes and members purely from their tags
#[derive(Clone, Copy, Debug, Default)]
pub struct TagClassifier;

impl TagClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Check if tags indicate a public transport route
    pub fn is_pt_route(&self, route: &RouteSequence) -> bool {
        route.has_tag("type", "route")
            && route
                .get("route")
                .map(|r| PT_ROUTE_TYPES.contains(&r))
                .unwrap_or(false)
    }
}

/// Check if a role is one of the driving roles
fn is_way_role(role: &str) -> bool {
    matches!(role, "" | "forward" | "backward")
}

/// Check if the segment is something a vehicle can travel on
fn is_travelable(segment: &Segment) -> bool {
    segment.tags.contains_key("highway")
        || segment.tags.contains_key("railway")
        || segment.tags.has_tag("route", "ferry")
}

impl RouteClassifier for TagClassifier {
    fn is_version_two_pt_route(&self, route: &RouteSequence) -> bool {
        self.is_pt_route(route) && route.has_tag("public_transport:version", "2")
    }

    fn is_two_direction_route(&self, route: &RouteSequence) -> bool {
        self.is_version_two_pt_route(route) && !route.has_tag("oneway", "yes")
    }

    fn is_pt_way(&self, member: &Member, segment: Option<&Segment>) -> bool {
        member.is_way()
            && is_way_role(&member.role)
            && segment.map(is_travelable).unwrap_or(false)
    }

    fn is_pt_stop(&self, member: &Member) -> bool {
        let role = member.role.as_str();
        role == "stop"
            || role == "platform"
            || role.starts_with("stop_")
            || role.starts_with("platform_")
    }
}
