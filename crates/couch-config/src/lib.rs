//! # couch-config
//!
//! Layered configuration loading for the CouchDB client using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`COUCHDB_*` prefix, `__` as separator)
//! 2. An explicit file passed to [`CouchConfig::load_from_file`]
//! 3. Project-level `.couchdb/config.toml`
//! 4. User-level `~/.config/couchdb-client/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `COUCHDB_SERVER__URL` -> `server.url`,
//! `COUCHDB_DATABASE__NAME` -> `database.name`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use couch_config::CouchConfig;
//!
//! let config = CouchConfig::load_with_dotenv().expect("config");
//!
//! if config.database.is_configured() {
//!     println!("{}/{}", config.server.base_url(), config.database.name);
//! }
//! ```

mod database;
mod error;
mod paging;
mod server;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use paging::PagingConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "COUCHDB_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CouchConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub paging: PagingConfig,
}

impl CouchConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration with an extra TOML file layered above the
    /// discovered files and below the environment.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::extract(Self::figment_with_file(Some(path)))
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        Self::figment_with_file(None)
    }

    fn figment_with_file(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".couchdb/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit file
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.paging.validate()?;
        Ok(config)
    }

    /// Fail unless a database name is configured.
    pub fn require_database(&self) -> Result<&str, ConfigError> {
        if self.database.is_configured() {
            Ok(&self.database.name)
        } else {
            Err(ConfigError::NotConfigured {
                section: "database".into(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("couchdb-client").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = CouchConfig::default();
        assert_eq!(config.server.url, "http://127.0.0.1:5984");
        assert!(!config.database.is_configured());
        assert_eq!(config.paging.page_size, 100);
    }

    #[test]
    fn require_database_reports_missing_section() {
        let config = CouchConfig::default();
        let err = config.require_database().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { section } if section == "database"));
    }

    #[test]
    fn require_database_returns_name() {
        let mut config = CouchConfig::default();
        config.database.name = "books".into();
        assert_eq!(config.require_database().unwrap(), "books");
    }
}
