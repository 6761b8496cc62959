//! OSM tag sets.

use std::collections::BTreeMap;

/// Key/value tags of a primitive.
///
/// Ordered, so two tag sets with the same content hash identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Check `key=value`
    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut tags = Tags::new();
        tags.put("type", "route");
        tags.put("route", "bus");

        assert!(tags.has_tag("type", "route"));
        assert!(!tags.has_tag("type", "superroute"));
        assert_eq!(tags.get("route"), Some("bus"));
        assert_eq!(tags.get("ref"), None);

        tags.put("type", "superroute");
        assert_eq!(tags.get("type"), Some("superroute"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a: Tags = [("ref", "1"), ("colour", "red")].into_iter().collect();
        let b: Tags = [("colour", "red"), ("ref", "1")].into_iter().collect();
        assert_eq!(a, b);
    }
}
