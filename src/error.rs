//! Error types for the sync core
//!
//! Nothing in this crate treats a fetch failure as fatal. The coordinator
//! logs these errors and keeps the previous store contents, so they never
//! reach the presentational layer as hard failures.

use thiserror::Error;

/// Errors that can occur while fetching dashboard collections
///
/// Each fetch independently succeeds or fails; a failed fetch leaves the
/// corresponding store collection untouched.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connection refused, DNS, broken stream)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status
    #[error("Server returned status {status}: {body}")]
    BadStatus {
        /// HTTP status code returned by the server
        status: u16,
        /// Error body as returned by the server, if readable
        body: String,
    },

    /// Response body could not be parsed into the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}
