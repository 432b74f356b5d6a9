//! Database lifecycle: existence, creation, deletion and info.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CouchDbClient, error::ClientError, http::check_response};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub db_name: String,
    #[serde(default)]
    pub doc_count: u64,
    #[serde(default)]
    pub doc_del_count: u64,
    #[serde(default)]
    pub update_seq: Value,
}

impl CouchDbClient {
    /// Whether the bound database exists.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures and statuses other
    /// than 200 and 404.
    pub async fn contains_db(&self) -> Result<bool, ClientError> {
        let resp = self.request(Method::HEAD, &self.db_path("")).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_response(resp, &self.database).await?;
        Ok(true)
    }

    /// Create the bound database. Returns `false` when it already existed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures or rejected requests.
    pub async fn create_db(&self) -> Result<bool, ClientError> {
        let resp = self.request(Method::PUT, &self.db_path("")).send().await?;
        match check_response(resp, &self.database).await {
            Ok(_) => {
                tracing::info!(database = %self.database, "created database");
                Ok(true)
            }
            Err(ClientError::PreconditionFailed { .. }) => {
                tracing::debug!(database = %self.database, "database already exists");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Create the bound database unless it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures or rejected requests.
    pub async fn ensure_db(&self) -> Result<(), ClientError> {
        if !self.contains_db().await? {
            self.create_db().await?;
        }
        Ok(())
    }

    /// Delete the bound database. Returns `false` when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures or rejected requests.
    pub async fn delete_db(&self) -> Result<bool, ClientError> {
        let resp = self.request(Method::DELETE, &self.db_path("")).send().await?;
        match check_response(resp, &self.database).await {
            Ok(_) => {
                tracing::info!(database = %self.database, "deleted database");
                Ok(true)
            }
            Err(ClientError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Document counts and update sequence of the bound database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the database does not exist.
    pub async fn db_info(&self) -> Result<DatabaseInfo, ClientError> {
        let resp = self.request(Method::GET, &self.db_path("")).send().await?;
        let resp = check_response(resp, &self.database).await?;
        Ok(resp.json().await?)
    }
}
