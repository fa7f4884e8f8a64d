//! Mission Control API client
//!
//! Thin HTTP client for the dashboard collection endpoints, the activity
//! stream, and the connectivity probe. Each fetch is an independent
//! request/response: one failing never blocks or corrupts the others.

use crate::error::FetchError;
use crate::model::{Agent, Event, Task};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Shared HTTP client for the Mission Control backend
///
/// Cheap to clone; all clones share one connection pool. The base URL is a
/// constructor argument so tests can point the client at a mock server.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    status_timeout: Duration,
}

/// Response shape of the connectivity-status endpoint
#[derive(Deserialize)]
struct StatusResponse {
    connected: bool,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`
    ///
    /// `status_timeout` bounds the connectivity probe; a probe that takes
    /// longer is treated as "disconnected".
    pub fn new(base_url: impl Into<String>, status_timeout: Duration) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            status_timeout,
        }
    }

    /// Base URL this client was constructed with
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch all agents visible in the given workspace scope
    pub async fn fetch_agents(&self, workspace: Option<&str>) -> Result<Vec<Agent>, FetchError> {
        self.get_json("/api/agents", &Self::scope_query(workspace))
            .await
    }

    /// Fetch all tasks visible in the given workspace scope
    pub async fn fetch_tasks(&self, workspace: Option<&str>) -> Result<Vec<Task>, FetchError> {
        self.get_json("/api/tasks", &Self::scope_query(workspace))
            .await
    }

    /// Fetch the most recent `limit` events in the given workspace scope
    pub async fn fetch_events(
        &self,
        workspace: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Event>, FetchError> {
        let mut query = Self::scope_query(workspace);
        query.push(("limit", limit.to_string()));
        self.get_json("/api/events", &query).await
    }

    /// Probe the backend connectivity-status endpoint
    ///
    /// Never fails: a timeout, transport error, non-success status, or
    /// malformed body all map to `false` (disconnected).
    pub async fn check_connectivity(&self) -> bool {
        let url = format!("{}/api/status", self.base_url);
        // One deadline covers the whole probe, headers and body both; a
        // backend that answers fast but trickles the body still counts as
        // disconnected once the timeout elapses.
        let probe = async {
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    match response.json::<StatusResponse>().await {
                        Ok(status) => status.connected,
                        Err(e) => {
                            debug!(error = %e, "Malformed connectivity status response");
                            false
                        }
                    }
                }
                Ok(response) => {
                    debug!(
                        status = response.status().as_u16(),
                        "Connectivity probe returned error status"
                    );
                    false
                }
                Err(e) => {
                    debug!(error = %e, "Connectivity probe failed");
                    false
                }
            }
        };
        match timeout(self.status_timeout, probe).await {
            Ok(connected) => connected,
            Err(_) => {
                debug!(
                    timeout_secs = self.status_timeout.as_secs(),
                    "Connectivity probe timed out"
                );
                false
            }
        }
    }

    /// Open the persistent activity stream for the given workspace scope
    ///
    /// Returns the raw response; the caller reads line-delimited messages
    /// from its byte stream.
    pub(crate) async fn open_stream(
        &self,
        workspace: Option<&str>,
    ) -> Result<reqwest::Response, FetchError> {
        let url = format!("{}/api/stream", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&Self::scope_query(workspace))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    // GET a JSON collection, reading the body as text first so decode
    // failures carry the offending payload in the error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Fetching collection");
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn scope_query(workspace: Option<&str>) -> Vec<(&'static str, String)> {
        match workspace {
            Some(workspace) => vec![("workspace", workspace.to_string())],
            None => Vec::new(),
        }
    }
}
