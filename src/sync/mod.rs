//! Live-sync reconciliation module
//!
//! This module keeps the view store consistent with the backend: a live
//! stream channel signals changes, a poll scheduler covers for it when it
//! is down, and the coordinator turns either source's signals into full
//! refreshes.

pub mod channel;
pub mod coordinator;
pub mod poller;

pub use channel::{ChannelSignal, LiveChannel};
pub use coordinator::{SyncMode, SyncService};
pub use poller::PollScheduler;
