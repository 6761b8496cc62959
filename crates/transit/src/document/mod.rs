//! Document storage and the edit transaction machinery.

pub mod history;
pub mod session;
pub mod store;
pub mod transaction;

pub use history::EditHistory;
pub use session::EditSession;
pub use store::{content_hash, RouteDocument};
pub use transaction::{Command, Transaction};
