//! Type-safe identifiers for OSM primitives.
//!
//! Negative values are provisional ids of primitives that have not been
//! uploaded yet.

use std::fmt;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(&self) -> i64 {
                self.0
            }

            /// True for primitives that only exist in the current edit.
            pub const fn is_provisional(&self) -> bool {
                self.0 < 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::new(id)
            }
        }
    };
}

impl_identifier!(NodeId);
impl_identifier!(SegmentId);
impl_identifier!(RouteId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let id1 = SegmentId::new(123);
        let id2 = SegmentId::from(123);

        assert_eq!(id1, id2);
        assert_ne!(id1, SegmentId::new(124));
    }

    #[test]
    fn test_identifier_hash() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(RouteId::new(7), 42);

        assert_eq!(map.get(&RouteId::new(7)), Some(&42));
    }

    #[test]
    fn test_identifier_display() {
        let id = RouteId::new(-3);
        assert_eq!(format!("{}", id), "-3");
        assert!(id.is_provisional());
        assert!(!NodeId::new(3).is_provisional());
    }
}
