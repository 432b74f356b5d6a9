//! # couch-client
//!
//! Async HTTP client for CouchDB.
//!
//! The client is bound to one database; operations are grouped by concern:
//! - server: health, info, uuids, database listing
//! - database: existence, creation, deletion, info
//! - documents: CRUD and `_bulk_docs`
//! - design documents and views, including `_all_docs`
//! - the `_changes` feed (normal mode)
//! - paging through large views with [`ViewPager`]

pub mod changes;
pub mod database;
pub mod design;
pub mod documents;
pub mod paging;
pub mod query;
pub mod server;
pub mod views;

mod error;
mod http;

pub use changes::ChangesQuery;
pub use database::DatabaseInfo;
pub use error::{ClientError, Result};
pub use paging::{PageFuture, ViewPager};
pub use query::ViewQuery;
pub use server::ServerInfo;

use std::fmt;
use std::time::Duration;

use couch_config::{CouchConfig, ServerConfig};
use couch_core::design::DESIGN_PREFIX;
use reqwest::Method;

const LOCAL_PREFIX: &str = "_local/";

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// HTTP client for a single CouchDB database.
#[derive(Debug, Clone)]
pub struct CouchDbClient {
    http: reqwest::Client,
    base_url: String,
    database: String,
    credentials: Option<Credentials>,
}

impl CouchDbClient {
    /// Create a client for `database` on the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("couchdb-client/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_http_client(http, base_url, database))
    }

    /// Create a client around a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            database: database.into(),
            credentials: None,
        }
    }

    /// Build a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConfigured`] when no database name is set and
    /// [`ClientError::Http`] when the HTTP client cannot be built.
    pub fn from_config(config: &CouchConfig) -> Result<Self> {
        let database = config
            .require_database()
            .map_err(|e| ClientError::NotConfigured(e.to_string()))?;
        Self::connect(&config.server, database)
    }

    /// Build a client for `database` from server settings alone.
    ///
    /// Server-level operations do not touch the database, so an empty name
    /// is accepted here.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] when the HTTP client cannot be built.
    pub fn connect(server: &ServerConfig, database: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(server.user_agent.as_str())
            .timeout(Duration::from_secs(server.timeout_secs))
            .build()?;

        let client = Self::with_http_client(http, server.base_url(), database);
        Ok(if server.has_credentials() {
            client.with_credentials(&server.username, &server.password)
        } else {
            client
        })
    }

    /// Send HTTP basic auth with every request.
    #[must_use]
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// A client for another database on the same server, sharing the
    /// connection pool and credentials.
    #[must_use]
    pub fn with_database(&self, database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request to `path`, relative to the server root.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        tracing::debug!(%method, path, "couchdb request");
        let url = format!("{}/{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match &self.credentials {
            Some(c) => builder.basic_auth(&c.username, Some(&c.password)),
            None => builder,
        }
    }

    /// Path of the bound database, optionally followed by `rest`.
    fn db_path(&self, rest: &str) -> String {
        let db = urlencoding::encode(&self.database);
        if rest.is_empty() {
            db.into_owned()
        } else {
            format!("{db}/{rest}")
        }
    }
}

/// Percent-encode a document id for use as a path.
///
/// `_design/` and `_local/` ids keep their separating slash.
pub(crate) fn doc_path(id: &str) -> String {
    for prefix in [DESIGN_PREFIX, LOCAL_PREFIX] {
        if let Some(rest) = id.strip_prefix(prefix) {
            return format!("{prefix}{}", urlencoding::encode(rest));
        }
    }
    urlencoding::encode(id).into_owned()
}
