use std::path::Path;

use anyhow::Context;
use couch_client::CouchDbClient;
use couch_config::CouchConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<CouchConfig> {
    // A missing .env is fine; a malformed one is not.
    if let Err(error) = dotenvy::dotenv()
        && !error.not_found()
    {
        return Err(error).context("failed to load .env file");
    }

    let mut config = match &flags.config {
        Some(path) => CouchConfig::load_from_file(Path::new(path))
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => CouchConfig::load().context("failed to load configuration")?,
    };
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut CouchConfig, flags: &GlobalFlags) {
    if let Some(url) = &flags.url {
        config.server.url.clone_from(url);
    }
    if let Some(database) = &flags.database {
        config.database.name.clone_from(database);
    }
    if let Some(user) = &flags.user {
        config.server.username.clone_from(user);
    }
    if let Some(password) = &flags.password {
        config.server.password.clone_from(password);
    }
}

/// Build the client. Server-level commands run without a database name.
pub fn connect(config: &CouchConfig, requires_database: bool) -> anyhow::Result<CouchDbClient> {
    if requires_database {
        config
            .require_database()
            .context("no database configured; pass --database or set COUCHDB_DATABASE__NAME")?;
    }
    tracing::debug!(url = %config.server.base_url(), database = %config.database.name, "connecting");
    Ok(CouchDbClient::connect(&config.server, config.database.name.as_str())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use pretty_assertions::assert_eq;

    fn flags() -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            quiet: false,
            verbose: false,
            url: None,
            database: None,
            user: None,
            password: None,
            config: None,
        }
    }

    #[test]
    fn flags_override_loaded_values() {
        let mut config = CouchConfig::default();
        config.database.name = "from-file".into();

        let mut flags = flags();
        flags.url = Some("http://couch.internal:5984".into());
        flags.database = Some("orders".into());
        flags.user = Some("admin".into());
        flags.password = Some("pw".into());
        apply_overrides(&mut config, &flags);

        assert_eq!(config.server.url, "http://couch.internal:5984");
        assert_eq!(config.database.name, "orders");
        assert!(config.server.has_credentials());
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut config = CouchConfig::default();
        config.database.name = "books".into();
        apply_overrides(&mut config, &flags());
        assert_eq!(config.database.name, "books");
        assert_eq!(config.server.url, "http://127.0.0.1:5984");
    }

    #[test]
    fn database_commands_need_a_name() {
        let config = CouchConfig::default();
        assert!(connect(&config, true).is_err());
        let client = connect(&config, false).unwrap();
        assert_eq!(client.database(), "");
    }
}
