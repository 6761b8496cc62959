//! Accumulator for a block of route members destined for a new route.

use itertools::Itertools;

use crate::models::Tags;

/// Member indices selected for extraction plus the metadata collected
/// from the routes that share those members
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractionGroup {
    indices: Vec<usize>,
    line_refs: Vec<String>,
    colours: Vec<String>,
    overrides: Tags,
}

impl ExtractionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut group = Self::new();
        for index in indices {
            group.add_segment_index(index);
        }
        group
    }

    pub fn add_segment_index(&mut self, index: usize) {
        if !self.indices.contains(&index) {
            self.indices.push(index);
        }
    }

    /// Record the `ref` of a route sharing this block; `;`-lists are split
    pub fn add_line_identifier(&mut self, line_ref: Option<&str>) {
        for value in line_ref.into_iter().flat_map(|r| r.split(';')) {
            push_unique(&mut self.line_refs, value);
        }
    }

    pub fn add_colour(&mut self, colour: Option<&str>) {
        if let Some(colour) = colour {
            push_unique(&mut self.colours, colour);
        }
    }

    /// Tag forced onto the extracted route (`name`, `state`, ...)
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.overrides.put(key, value);
    }

    /// Indices in the order they were added
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn sorted_indices(&self) -> Vec<usize> {
        self.indices.iter().copied().sorted_unstable().collect()
    }

    pub fn first_index(&self) -> Option<usize> {
        self.indices.iter().copied().min()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn line_identifiers(&self) -> &[String] {
        &self.line_refs
    }

    pub fn colours(&self) -> &[String] {
        &self.colours
    }

    pub fn overrides(&self) -> &Tags {
        &self.overrides
    }

    /// Sorted, `;`-joined line refs for the `route_ref` tag
    pub fn route_ref_signature(&self) -> Option<String> {
        if self.line_refs.is_empty() {
            return None;
        }
        Some(
            self.line_refs
                .iter()
                .sorted_by(|a, b| natural_cmp(a, b))
                .join(";"),
        )
    }

    /// `;`-joined colours in collection order
    pub fn colour_signature(&self) -> Option<String> {
        (!self.colours.is_empty()).then(|| self.colours.join(";"))
    }

    /// Clamp an insertion index into `0..=upper_bound`
    pub fn limit_index_to(value: usize, upper_bound: usize) -> usize {
        value.min(upper_bound)
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// Numeric refs in numeric order, everything else after them alphabetically
fn natural_cmp(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
