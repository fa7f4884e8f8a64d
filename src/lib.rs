//! Mission Control Live-Sync Core
//!
//! Keeps dashboard state (agents, tasks, activity events) consistent with
//! a backend over a persistent event stream, falling back to periodic
//! polling when the stream is down. The presentational layer reads from
//! the [`state::ViewStore`] and never talks to the backend directly.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
/// View state management
///
/// Holds the latest collections, change notification, and derived view
/// computations.
pub mod state;
pub mod sync;
