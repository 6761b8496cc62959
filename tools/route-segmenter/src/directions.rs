use anyhow::{Context, Result};
use hashbrown::HashMap;
use pt_assistant_transit::{Direction, DirectionCalculator, RouteId, RouteSequence, Segment};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Directions worked out ahead of time, keyed by route id.
///
/// Routes without an entry get `UNKNOWN` for every way, which never
/// raises an issue.
#[derive(Debug, Default)]
pub struct PrecomputedDirections {
    routes: HashMap<RouteId, Vec<Direction>>,
}

impl PrecomputedDirections {
    /// Parse `{ "<route id>": ["FORWARD", "BACKWARD", ...] }`
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: BTreeMap<i64, Vec<Direction>> =
            serde_json::from_str(json).context("Invalid directions file")?;
        Ok(Self {
            routes: parsed
                .into_iter()
                .map(|(id, directions)| (RouteId::new(id), directions))
                .collect(),
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let directions = Self::from_json(&json)?;
        log::info!("Directions for {} routes", directions.len());
        Ok(directions)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}

impl DirectionCalculator for PrecomputedDirections {
    fn compute_directions(&self, route: &RouteSequence, segments: &[Arc<Segment>]) -> Vec<Direction> {
        match self.routes.get(&route.id) {
            Some(directions) => directions.clone(),
            None => {
                log::debug!("No directions for route {}", route.id);
                vec![Direction::Unknown; segments.len()]
            }
        }
    }
}
