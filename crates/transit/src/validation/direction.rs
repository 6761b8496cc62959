//! Checks that two-direction routes respect oneway roads and do not run
//! over roundabouts that were never split into separate ways.

use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

use crate::document::{EditSession, Transaction};
use crate::identifiers::{RouteId, SegmentId};
use crate::models::{
    Direction, DirectionCalculator, DocumentStore, Member, Oneway, RouteClassifier, RouteSequence,
};
use crate::topology::TopologyLocator;

pub const FIX_LABEL: &str = "Remove way from route";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(u32)]
pub enum IssueCode {
    OnewayViolation = 3731,
    UnsplitRoundabout = 3732,
}

impl IssueCode {
    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn is_fixable(self) -> bool {
        matches!(self, Self::OnewayViolation)
    }

    fn message(self) -> &'static str {
        match self {
            Self::OnewayViolation => "PT: Route passes a oneway road in wrong direction",
            Self::UnsplitRoundabout => "PT: Route passes on an unsplit roundabout",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Warning,
}

/// A problem found on one way of one route
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub severity: Severity,
    pub route: RouteId,
    pub segment: SegmentId,
    pub message: String,
}

impl ValidationIssue {
    fn new(code: IssueCode, route: RouteId, segment: SegmentId) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            route,
            segment,
            message: code.message().to_string(),
        }
    }

    pub fn is_fixable(&self) -> bool {
        self.code.is_fixable()
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] route {} way {}: {}",
            self.severity,
            self.code.number(),
            self.route,
            self.segment,
            self.message
        )
    }
}

/// Result of asking for a repair
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FixOutcome {
    Fixed(Transaction),
    NoFixAvailable,
}

pub struct DirectionValidator<'a> {
    locator: TopologyLocator<'a>,
    calculator: &'a dyn DirectionCalculator,
}

impl<'a> DirectionValidator<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        classifier: &'a dyn RouteClassifier,
        calculator: &'a dyn DirectionCalculator,
    ) -> Self {
        Self {
            locator: TopologyLocator::new(store, classifier),
            calculator,
        }
    }

    /// Issues of one route, in member order
    pub fn validate(&self, route: &RouteSequence) -> Vec<ValidationIssue> {
        if !self.locator.classifier().is_two_direction_route(route) {
            return Vec::new();
        }

        let segments: Vec<_> = self
            .locator
            .path_members(route)
            .into_iter()
            .map(|(_, segment)| segment)
            .collect();
        if segments.is_empty() {
            return Vec::new();
        }

        let mut directions = self.calculator.compute_directions(route, &segments);
        if directions.len() != segments.len() {
            log::warn!(
                "Direction calculator returned {} entries for {} ways of route {}",
                directions.len(),
                segments.len(),
                route.id
            );
            directions.resize(segments.len(), Direction::Unknown);
        }

        let mut issues = Vec::new();
        for (segment, direction) in segments.iter().zip(directions) {
            let against_oneway = matches!(
                (segment.oneway(), direction),
                (Oneway::Forward, Direction::Backward) | (Oneway::Backward, Direction::Forward)
            );
            if against_oneway && !segment.has_bus_exception() {
                issues.push(ValidationIssue::new(IssueCode::OnewayViolation, route.id, segment.id));
            }
            if direction.is_roundabout() {
                issues.push(ValidationIssue::new(IssueCode::UnsplitRoundabout, route.id, segment.id));
            }
        }

        issues
    }

    /// Issues of every route in the store
    pub fn validate_all(&self) -> Vec<ValidationIssue> {
        let routes = self.locator.store().routes();
        let issues: Vec<_> = routes.iter().flat_map(|route| self.validate(route)).collect();
        log::info!("Checked {} routes, {} issues", routes.len(), issues.len());
        issues
    }

    /// Drop the offending way from the route.
    ///
    /// Stops are listed first, then the remaining ways; `stop_position`
    /// becomes `stop` and `forward`/`backward` become the empty role.
    pub fn fix_issue(&self, issue: &ValidationIssue) -> FixOutcome {
        if !issue.is_fixable() {
            return FixOutcome::NoFixAvailable;
        }
        let store = self.locator.store();
        let Some(route) = store.route(issue.route) else {
            return FixOutcome::NoFixAvailable;
        };
        if !route.references_way(issue.segment) {
            return FixOutcome::NoFixAvailable;
        }

        let classifier = self.locator.classifier();
        let stops = route
            .members
            .iter()
            .filter(|member| classifier.is_pt_stop(member))
            .map(|member| match member.role.as_str() {
                "stop_position" => member.with_role("stop"),
                _ => member.clone(),
            });
        let ways = route
            .members
            .iter()
            .filter(|member| {
                self.locator
                    .path_way(member)
                    .is_some_and(|id| id != issue.segment)
            })
            .map(|member| match member.role.as_str() {
                "forward" | "backward" => member.with_role(""),
                _ => member.clone(),
            });
        let members: Vec<Member> = stops.chain(ways).collect();

        let mut clone = route.as_ref().clone();
        clone.members = members;
        let mut session = EditSession::new(store);
        session.replace(clone);

        match session.finish(FIX_LABEL) {
            Some(transaction) => FixOutcome::Fixed(transaction),
            None => FixOutcome::NoFixAvailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use super::*;
    use crate::document::{Command, RouteDocument};
    use crate::fixtures::*;
    use crate::models::{Segment, TagClassifier, Tags};

    /// Hands out the same directions for every route
    struct FixedDirections(Vec<Direction>);

    impl DirectionCalculator for FixedDirections {
        fn compute_directions(&self, _route: &RouteSequence, _segments: &[Arc<Segment>]) -> Vec<Direction> {
            self.0.clone()
        }
    }

    fn oneway(id: i64, extra: &[(&str, &str)]) -> Segment {
        let mut tags = Tags::from_iter([("highway", "primary"), ("oneway", "yes")]);
        for (key, value) in extra {
            tags.put(*key, *value);
        }
        Segment::new(id, tags)
    }

    fn document(segment: Segment) -> RouteDocument {
        let mut segments = roads(&[1, 3]);
        segments.push(segment);
        RouteDocument::from_data(segments, vec![bus_route(10, &[100], &[1, 2, 3])]).unwrap()
    }

    fn validate(document: &RouteDocument, directions: Vec<Direction>) -> Vec<ValidationIssue> {
        let calculator = FixedDirections(directions);
        let validator = DirectionValidator::new(document, &TagClassifier, &calculator);
        validator.validate_all()
    }

    use Direction::*;

    #[test]
    fn test_oneway_violation() {
        let document = document(oneway(2, &[]));
        let issues = validate(&document, vec![Forward, Backward, Forward]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::OnewayViolation);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].route, RouteId::new(10));
        assert_eq!(issues[0].segment, SegmentId::new(2));
        assert!(issues[0].is_fixable());
        assert_eq!(issues[0].code.number(), 3731);
    }

    #[test]
    fn test_reversed_oneway() {
        let document = document(Segment::new(2, Tags::from_iter([("highway", "primary"), ("oneway", "-1")])));
        assert_eq!(validate(&document, vec![Forward, Forward, Forward]).len(), 1);
        assert!(validate(&document, vec![Forward, Backward, Forward]).is_empty());
    }

    #[test]
    fn test_bus_exceptions_suppress_violation() {
        for exception in [("oneway:bus", "no"), ("busway", "lane"), ("busway", "opposite_lane")] {
            let document = document(oneway(2, &[exception]));
            assert!(validate(&document, vec![Forward, Backward, Forward]).is_empty());
        }
    }

    #[test]
    fn test_unsplit_roundabout() {
        let document = document(Segment::new(2, Tags::from_iter([("highway", "primary")])));
        let issues = validate(&document, vec![Forward, RoundaboutLeft, Forward]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::UnsplitRoundabout);
        assert!(!issues[0].is_fixable());

        let calculator = FixedDirections(vec![]);
        let validator = DirectionValidator::new(&document, &TagClassifier, &calculator);
        assert_eq!(validator.fix_issue(&issues[0]), FixOutcome::NoFixAvailable);
    }

    #[test]
    fn test_roundabout_on_oneway_reports_roundabout_only() {
        let document = document(oneway(2, &[]));
        let issues = validate(&document, vec![Forward, RoundaboutRight, Forward]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::UnsplitRoundabout);
    }

    #[test]
    fn test_one_direction_routes_are_skipped() {
        let mut document = document(oneway(2, &[]));
        let mut route = document.route(RouteId::new(10)).unwrap().as_ref().clone();
        route.put("oneway", "yes");
        let before = document.route(RouteId::new(10)).unwrap();
        document
            .apply(&Transaction::new("oneway", vec![Command::Replace { before, after: Arc::new(route) }]))
            .unwrap();

        assert!(validate(&document, vec![Forward, Backward, Forward]).is_empty());
    }

    #[test]
    fn test_short_calculator_output_is_padded() {
        let document = document(oneway(2, &[]));
        assert!(validate(&document, vec![Forward]).is_empty());
    }

    #[test]
    fn test_fix_removes_way_and_normalises_roles() {
        let route = RouteSequence::new(
            10,
            bus_tags(),
            vec![
                Member::way("forward", 1),
                Member::node("stop_position", 100),
                Member::way("", 2),
                Member::node("platform", 101),
                Member::way("backward", 3),
                Member::node("", 102),
            ],
        );
        let mut segments = roads(&[1, 3]);
        segments.push(oneway(2, &[]));
        let mut document = RouteDocument::from_data(segments, vec![route]).unwrap();

        let calculator = FixedDirections(vec![Forward, Backward, Forward]);
        let validator = DirectionValidator::new(&document, &TagClassifier, &calculator);
        let issues = validator.validate_all();
        assert_eq!(issues.len(), 1);

        let FixOutcome::Fixed(tx) = validator.fix_issue(&issues[0]) else {
            panic!("expected a fix");
        };
        assert_eq!(tx.label, FIX_LABEL);
        let fixed = tx.replaced_routes().next().unwrap();
        assert_eq!(
            fixed.members,
            vec![
                Member::node("stop", 100),
                Member::node("platform", 101),
                Member::way("", 1),
                Member::way("", 3),
            ]
        );

        document.apply(&tx).unwrap();
        let validator = DirectionValidator::new(&document, &TagClassifier, &calculator);
        assert_eq!(validator.fix_issue(&issues[0]), FixOutcome::NoFixAvailable);
    }

    #[test]
    fn test_issue_code_names() {
        assert_eq!(IssueCode::UnsplitRoundabout.to_string(), "UNSPLIT_ROUNDABOUT");
        assert_eq!(IssueCode::from_str("ONEWAY_VIOLATION").unwrap(), IssueCode::OnewayViolation);
        assert_eq!(IssueCode::UnsplitRoundabout.number(), 3732);
    }
}
