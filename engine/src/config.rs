//! Engine Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the CSV file containing user permissions
    pub permissions_url: String,

    /// Display name of the local viewer to resolve
    pub local_username: String,

    /// Usernames always granted full permissions (comma-separated)
    pub bypass_users: Vec<String>,

    /// Maximum number of supporters expected per roster bucket (default: 100)
    pub max_patrons: usize,

    /// Reload the whitelist every N seconds (optional; load once if unset)
    pub reload_interval_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            permissions_url: env::var("PERMISSIONS_URL")
                .context("PERMISSIONS_URL must be set")?,
            local_username: env::var("LOCAL_USERNAME").context("LOCAL_USERNAME must be set")?,
            bypass_users: env::var("BYPASS_USERS").ok().map_or_else(Vec::new, |s| {
                s.split(',')
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty())
                    .collect()
            }),
            max_patrons: env::var("MAX_PATRONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            reload_interval_secs: env::var("RELOAD_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            permissions_url: "http://localhost:8000/whitelist.csv".into(),
            local_username: "TestViewer".into(),
            bypass_users: Vec::new(),
            max_patrons: 100,
            reload_interval_secs: None,
        }
    }
}
