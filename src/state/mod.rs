// View state management module
// Holds the store the presentational layer reads from, plus derived views

pub mod store;
pub mod views;

pub use store::{ScopeToken, Snapshot, ViewStore};
pub use views::BlockedPolicy;
