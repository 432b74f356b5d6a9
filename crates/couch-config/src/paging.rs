//! View paging settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default rows per page.
const fn default_page_size() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PagingConfig {
    /// Rows per page when iterating views.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl PagingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "paging.page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
