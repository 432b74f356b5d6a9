//! `_changes` feed in `normal` mode.

use couch_core::ChangesResponse;
use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::{CouchDbClient, error::ClientError, http::check_response, query::encode_pairs};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangesQuery {
    /// Start after this sequence; `now` skips history.
    pub since: Option<String>,
    pub limit: Option<usize>,
    pub include_docs: bool,
    pub descending: bool,
    /// Filter function as `design/filter`.
    pub filter: Option<String>,
}

impl ChangesQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("feed", "normal".to_string())];
        if let Some(since) = &self.since {
            pairs.push(("since", since.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if self.include_docs {
            pairs.push(("include_docs", "true".into()));
        }
        if self.descending {
            pairs.push(("descending", "true".into()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        pairs
    }
}

impl CouchDbClient {
    /// Read the changes feed of the bound database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, server or decoding errors.
    pub async fn changes<D: DeserializeOwned>(
        &self,
        query: &ChangesQuery,
    ) -> Result<ChangesResponse<D>, ClientError> {
        let path = self.db_path("_changes");
        let url = format!("{path}{}", encode_pairs(&query.to_pairs()));
        let resp = check_response(self.request(Method::GET, &url).send().await?, &path).await?;
        let data: ChangesResponse<D> = resp.json().await?;
        tracing::debug!(results = data.results.len(), last_seq = %data.last_seq, "changes feed");
        Ok(data)
    }
}
