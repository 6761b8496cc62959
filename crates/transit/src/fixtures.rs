//! Builders for test documents.

use crate::models::{Member, RouteSequence, Segment, Tags};

pub fn road(id: i64) -> Segment {
    Segment::new(id, Tags::from_iter([("highway", "residential")]))
}

pub fn roads(ids: &[i64]) -> Vec<Segment> {
    ids.iter().map(|&id| road(id)).collect()
}

pub fn bus_tags() -> Tags {
    Tags::from_iter([
        ("type", "route"),
        ("route", "bus"),
        ("public_transport:version", "2"),
    ])
}

/// Version 2 bus route: stop nodes first, then ways
pub fn bus_route(id: i64, stops: &[i64], ways: &[i64]) -> RouteSequence {
    let members = stops
        .iter()
        .map(|&n| Member::node("stop", n))
        .chain(ways.iter().map(|&w| Member::way("", w)))
        .collect();
    RouteSequence::new(id, bus_tags(), members)
}

/// Bus route with `ref` and `colour`
pub fn line(id: i64, line_ref: &str, colour: &str, ways: &[i64]) -> RouteSequence {
    let mut route = bus_route(id, &[], ways);
    route.put("ref", line_ref);
    route.put("colour", colour);
    route
}

pub fn superroute(id: i64, children: &[i64]) -> RouteSequence {
    RouteSequence::new(
        id,
        Tags::from_iter([("type", "superroute"), ("route", "bus")]),
        children.iter().map(|&c| Member::relation("", c)).collect(),
    )
}

/// Way ids of a route's way members, in order
pub fn way_ids(route: &RouteSequence) -> Vec<i64> {
    route
        .members
        .iter()
        .filter_map(|m| m.way_id().map(|id| id.get()))
        .collect()
}
