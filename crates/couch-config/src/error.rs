//! Errors raised while loading the client configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file or `COUCHDB_*` variable could not be read or merged.
    #[error("cannot load CouchDB client settings: {0}")]
    Figment(#[from] figment::Error),

    /// The operation needs a section that has no usable values, e.g. a
    /// database command without `database.name`.
    #[error(
        "[{section}] is not set; add it to .couchdb/config.toml or set COUCHDB_{}__*",
        .section.to_uppercase()
    )]
    NotConfigured { section: String },

    /// A setting was read but is out of range.
    #[error("{field} is invalid: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_section_names_file_and_variables() {
        let err = ConfigError::NotConfigured {
            section: "database".into(),
        };
        assert_eq!(
            err.to_string(),
            "[database] is not set; add it to .couchdb/config.toml or set COUCHDB_DATABASE__*"
        );
    }

    #[test]
    fn invalid_value_names_the_setting() {
        let err = ConfigError::InvalidValue {
            field: "paging.page_size".into(),
            reason: "must be at least 1".into(),
        };
        assert_eq!(err.to_string(), "paging.page_size is invalid: must be at least 1");
    }
}
