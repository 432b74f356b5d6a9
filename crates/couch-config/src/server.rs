//! CouchDB server connection settings.

use serde::{Deserialize, Serialize};

fn default_url() -> String {
    "http://127.0.0.1:5984".to_string()
}

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("couchdb-client/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server root URL (e.g., `http://127.0.0.1:5984`).
    #[serde(default = "default_url")]
    pub url: String,

    /// Basic auth user. Empty means anonymous access.
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ServerConfig {
    /// Check if basic auth credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }

    /// The server URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_server() {
        let config = ServerConfig::default();
        assert_eq!(config.url, "http://127.0.0.1:5984");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("couchdb-client/"));
        assert!(!config.has_credentials());
    }

    #[test]
    fn base_url_strips_trailing_slashes() {
        let config = ServerConfig {
            url: "https://couch.example.com//".into(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://couch.example.com");
    }

    #[test]
    fn credentials_require_a_username() {
        let config = ServerConfig {
            password: "secret".into(),
            ..Default::default()
        };
        assert!(!config.has_credentials());

        let config = ServerConfig {
            username: "admin".into(),
            ..Default::default()
        };
        assert!(config.has_credentials());
    }
}
