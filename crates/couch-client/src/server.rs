//! Server-level operations: health, info, uuids and database listing.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CouchDbClient, error::ClientError, http::check_response};

/// The welcome document served at `/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub couchdb: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Value>,
}

impl ServerInfo {
    #[must_use]
    pub fn is_welcome(&self) -> bool {
        self.couchdb == "Welcome"
    }
}

#[derive(Deserialize)]
struct UuidsResponse {
    uuids: Vec<String>,
}

impl CouchDbClient {
    /// Fetch the server welcome document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the server answers
    /// with an error status.
    pub async fn server_info(&self) -> Result<ServerInfo, ClientError> {
        let resp = check_response(self.request(Method::GET, "").send().await?, "/").await?;
        Ok(resp.json().await?)
    }

    /// Whether the server is reachable and identifies as CouchDB.
    ///
    /// Failures are logged and reported as `false`.
    pub async fn health_check(&self) -> bool {
        match self.server_info().await {
            Ok(info) => info.is_welcome(),
            Err(e) => {
                tracing::warn!(base_url = %self.base_url, %e, "couchdb health check failed");
                false
            }
        }
    }

    /// Ask the server for `count` fresh UUIDs.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for a zero count, otherwise
    /// any transport or server error.
    pub async fn uuids(&self, count: usize) -> Result<Vec<String>, ClientError> {
        if count == 0 {
            return Err(ClientError::InvalidArgument(
                "uuid count must be at least 1".into(),
            ));
        }
        let path = format!("_uuids?count={count}");
        let resp = check_response(self.request(Method::GET, &path).send().await?, "_uuids").await?;
        let data: UuidsResponse = resp.json().await?;
        Ok(data.uuids)
    }

    /// Names of all databases on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or is rejected.
    pub async fn all_dbs(&self) -> Result<Vec<String>, ClientError> {
        let resp =
            check_response(self.request(Method::GET, "_all_dbs").send().await?, "_all_dbs").await?;
        Ok(resp.json().await?)
    }
}
