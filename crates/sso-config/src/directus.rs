//! Role store (Directus REST API) connection settings.

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectusConfig {
    /// Base URL of the API, e.g. `https://cms.example.com`.
    #[serde(default, deserialize_with = "crate::text::deserialize")]
    pub url: String,

    /// Static bearer token with read access to roles.
    #[serde(default, deserialize_with = "crate::text::deserialize")]
    pub token: String,

    /// Per-request timeout for role lookups.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DirectusConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DirectusConfig {
    /// Check if the connection has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.token.is_empty()
    }
}
