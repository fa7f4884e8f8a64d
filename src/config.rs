//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

/// Sync core configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Polling fallback configuration
    pub polling: PollingConfig,
    /// Fetch behavior configuration
    pub fetch: FetchConfig,
}

/// Backend API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the Mission Control backend
    pub base_url: String,
    /// Workspace scope to sync, if any
    pub workspace: Option<String>,
}

/// Polling fallback configuration
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Interval between activity refreshes while the stream is down (seconds)
    pub activity_interval_secs: u64,
    /// Interval between backend connectivity probes (seconds)
    pub status_interval_secs: u64,
}

/// Fetch behavior configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum number of events requested per refresh (most recent first)
    pub events_limit: usize,
    /// Abort the connectivity probe after this many seconds
    pub status_timeout_secs: u64,
}

impl SyncConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig {
                base_url: env::var("API_BASE_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
                workspace: env::var("WORKSPACE").ok().filter(|w| !w.is_empty()),
            },
            polling: PollingConfig {
                activity_interval_secs: env::var("ACTIVITY_POLL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(20),
                status_interval_secs: env::var("STATUS_POLL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(45),
            },
            fetch: FetchConfig {
                events_limit: env::var("EVENTS_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(50),
                status_timeout_secs: env::var("STATUS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            },
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://127.0.0.1:8080".to_string(),
                workspace: None,
            },
            polling: PollingConfig {
                activity_interval_secs: 20,
                status_interval_secs: 45,
            },
            fetch: FetchConfig {
                events_limit: 50,
                status_timeout_secs: 5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "API_BASE_URL",
            "WORKSPACE",
            "ACTIVITY_POLL_SECS",
            "STATUS_POLL_SECS",
            "EVENTS_LIMIT",
            "STATUS_TIMEOUT_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = SyncConfig::from_env();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
        assert!(config.api.workspace.is_none());
        assert_eq!(config.polling.activity_interval_secs, 20);
        assert_eq!(config.polling.status_interval_secs, 45);
        assert_eq!(config.fetch.events_limit, 50);
        assert_eq!(config.fetch.status_timeout_secs, 5);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("API_BASE_URL", "http://mc.internal:9000");
        std::env::set_var("WORKSPACE", "alpha");
        std::env::set_var("ACTIVITY_POLL_SECS", "5");
        std::env::set_var("EVENTS_LIMIT", "10");
        let config = SyncConfig::from_env();
        assert_eq!(config.api.base_url, "http://mc.internal:9000");
        assert_eq!(config.api.workspace.as_deref(), Some("alpha"));
        assert_eq!(config.polling.activity_interval_secs, 5);
        assert_eq!(config.fetch.events_limit, 10);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_workspace_treated_as_none() {
        clear_env();
        std::env::set_var("WORKSPACE", "");
        let config = SyncConfig::from_env();
        assert!(config.api.workspace.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_numbers_fall_back_to_defaults() {
        clear_env();
        std::env::set_var("ACTIVITY_POLL_SECS", "not-a-number");
        let config = SyncConfig::from_env();
        assert_eq!(config.polling.activity_interval_secs, 20);
        clear_env();
    }
}
