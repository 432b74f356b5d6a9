//! Target database settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database name (e.g., `books`).
    #[serde(default)]
    pub name: String,

    /// Create the database on first use when it does not exist.
    #[serde(default)]
    pub create_if_missing: bool,
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.name.is_empty()
    }
}
