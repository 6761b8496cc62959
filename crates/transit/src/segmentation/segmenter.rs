//! Automatic splitting of a route into blocks shared by the same routes.
//!
//! The route is scanned back to front. Every way is compared against the
//! version 2 routes that also use it; a block ends where one of those routes
//! starts, ends or arrives from a different way.

use crate::document::{EditSession, Transaction};
use crate::identifiers::{RouteId, SegmentId};
use crate::models::{DocumentStore, Member, RouteClassifier, RouteSequence, WayTriplet};
use crate::segmentation::group::ExtractionGroup;
use crate::topology::TopologyLocator;

/// Tags copied from the source onto every segment route
pub const SPLIT_CARRIED_TAGS: &[&str] = &["type", "route"];

pub const SPLIT_LABEL: &str = "Split route into segments";

/// Progress of one backward scan
#[derive(Debug)]
enum ScanState {
    /// Adding members to the open group
    Accumulating(ExtractionGroup),
    /// The open group is closed before the next member is added
    PendingSplit(ExtractionGroup),
    /// A stop was reached, nothing more to collect
    Done,
}

#[derive(Clone, Copy)]
pub struct RouteSegmenter<'a> {
    locator: TopologyLocator<'a>,
}

impl<'a> RouteSegmenter<'a> {
    pub fn new(locator: TopologyLocator<'a>) -> Self {
        Self { locator }
    }

    /// Blocks of member indices to extract, last block first.
    ///
    /// Indices refer to `route` as given. Extracting the groups in the
    /// returned order keeps the indices of the remaining groups valid.
    pub fn plan(&self, route: &RouteSequence) -> Vec<ExtractionGroup> {
        let ways: Vec<Option<SegmentId>> = route
            .members
            .iter()
            .map(|member| self.scan_way(route, member))
            .collect();
        if ways.len() < 2 || ways.iter().all(Option::is_none) {
            log::debug!("Route {} has nothing to split", route.id);
            return Vec::new();
        }

        let mut groups = Vec::new();
        let last = ways.len() - 1;
        let mut seed = ExtractionGroup::new();
        if ways[last].is_some() {
            seed.add_segment_index(last);
        }

        let mut state = ScanState::Accumulating(seed);
        for index in (0..last).rev() {
            state = self.step(state, index, &ways, route, &mut groups);
            if matches!(state, ScanState::Done) {
                break;
            }
        }
        if let ScanState::Accumulating(group) | ScanState::PendingSplit(group) = state {
            flush(&mut groups, group);
        }

        log::debug!("Route {} splits into {} segments", route.id, groups.len());
        groups
    }

    /// Way occupying this position of the scan.
    ///
    /// A way missing from the store (clipped extracts) still counts unless
    /// its role marks it as a stop or platform.
    fn scan_way(&self, route: &RouteSequence, member: &Member) -> Option<SegmentId> {
        if let Some(id) = self.locator.path_way(member) {
            return Some(id);
        }
        let id = member.way_id()?;
        if self.locator.store().segment(id).is_some() || self.locator.classifier().is_pt_stop(member) {
            return None;
        }
        log::debug!("Way {} of route {} is not loaded, keeping it in the scan", id, route.id);
        Some(id)
    }

    fn step(
        &self,
        state: ScanState,
        index: usize,
        ways: &[Option<SegmentId>],
        route: &RouteSequence,
        groups: &mut Vec<ExtractionGroup>,
    ) -> ScanState {
        let mut group = match state {
            ScanState::Done => return ScanState::Done,
            ScanState::Accumulating(group) => group,
            ScanState::PendingSplit(group) => {
                if ways[index].is_some() {
                    flush(groups, group);
                    ExtractionGroup::new()
                } else {
                    group
                }
            }
        };

        let Some(current) = ways[index] else {
            flush(groups, group);
            return ScanState::Done;
        };
        group.add_segment_index(index);

        let previous = index.checked_sub(1).and_then(|i| ways[i]);
        let next = ways.get(index + 1).copied().flatten();

        if self.compare_with_siblings(route, &mut group, previous, current, next) {
            ScanState::PendingSplit(group)
        } else {
            ScanState::Accumulating(group)
        }
    }

    /// Check the routes sharing `current`; collects their refs and colours
    /// and returns whether the group must end after `current`
    fn compare_with_siblings(
        &self,
        route: &RouteSequence,
        group: &mut ExtractionGroup,
        previous: Option<SegmentId>,
        current: SegmentId,
        next: Option<SegmentId>,
    ) -> bool {
        let classifier = self.locator.classifier();
        let mut split = false;

        'siblings: for sibling in self.locator.store().segment_referrers(current) {
            if sibling.id == route.id
                || sibling.route_type() != Some("route")
                || !classifier.is_version_two_pt_route(&sibling)
            {
                continue;
            }

            for triplet in self.locator.locate(&sibling, current) {
                // The sibling starts or ends here
                if triplet.is_terminal() {
                    split = true;
                }

                if runs_same_direction(previous, next, &triplet) {
                    if !split && triplet.previous.is_some() && triplet.previous != previous {
                        split = true;
                    }
                    if !split {
                        if let Some(previous) = previous {
                            split = self.previous_diverges(previous, current);
                        }
                    }
                    group.add_line_identifier(sibling.get("ref"));
                    group.add_colour(sibling.get("colour"));
                }

                if split {
                    log::trace!("Split after way {} because of route {}", current, sibling.id);
                    break 'siblings;
                }
            }
        }

        split
    }

    /// Some route through `previous` continues on another way than `current`.
    ///
    /// Only the first occurrence of `previous` in each route is looked at.
    fn previous_diverges(&self, previous: SegmentId, current: SegmentId) -> bool {
        let classifier = self.locator.classifier();
        self.locator
            .store()
            .segment_referrers(previous)
            .iter()
            .filter(|parent| classifier.is_version_two_pt_route(parent))
            .filter_map(|parent| self.locator.first_next(parent, previous))
            .any(|after| after != current)
    }
}

/// The sibling does not traverse `current` against the route
fn runs_same_direction(previous: Option<SegmentId>, next: Option<SegmentId>, triplet: &WayTriplet) -> bool {
    let reversed_ahead = triplet.next.is_some() && triplet.next == previous;
    let reversed_behind = triplet.previous.is_some() && triplet.previous == next;
    !(reversed_ahead || reversed_behind)
}

fn flush(groups: &mut Vec<ExtractionGroup>, group: ExtractionGroup) {
    if !group.is_empty() {
        groups.push(group);
    }
}

/// Plan the segments of `route` without changing anything
pub fn plan_segments(
    store: &dyn DocumentStore,
    classifier: &dyn RouteClassifier,
    route: &RouteSequence,
) -> Vec<ExtractionGroup> {
    RouteSegmenter::new(TopologyLocator::new(store, classifier)).plan(route)
}

/// Move every segment of a route into a route of its own.
///
/// The route keeps one relation member per segment, in the original order,
/// and optionally becomes a superroute. Returns `None` when the route does
/// not exist or has no ways to split.
pub fn split_in_segments(
    store: &dyn DocumentStore,
    classifier: &dyn RouteClassifier,
    route_id: RouteId,
    convert_to_superroute: bool,
) -> Option<Transaction> {
    let Some(original) = store.route(route_id) else {
        log::warn!("Route {} not found, nothing to split", route_id);
        return None;
    };

    let groups = plan_segments(store, classifier, &original);
    if groups.is_empty() {
        return None;
    }

    let mut session = EditSession::new(store);
    let mut clone = original.as_ref().clone();
    for group in &groups {
        group.extract_to_relation(&mut session, &mut clone, SPLIT_CARRIED_TAGS, true);
    }
    if convert_to_superroute {
        clone.put("type", "superroute");
    }
    session.replace(clone);

    session.finish(SPLIT_LABEL)
}
