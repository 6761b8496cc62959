//! Splitting routes into segments and extracting members into new routes.

pub mod extractor;
pub mod group;
pub mod segmenter;
pub mod superroute;

pub use extractor::{extract_members, ExtractOptions};
pub use group::ExtractionGroup;
pub use segmenter::{plan_segments, split_in_segments, RouteSegmenter};
pub use superroute::{link_to_superroutes, superroute_parents};
