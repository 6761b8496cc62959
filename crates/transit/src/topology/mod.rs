//! Positional facts about segments inside routes.

pub mod locator;

pub use locator::TopologyLocator;
