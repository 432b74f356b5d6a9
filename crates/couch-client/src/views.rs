//! View and `_all_docs` queries.

use couch_core::design::design_id;
use couch_core::{AllDocsResponse, ReducedViewQueryResponse, ViewQueryResponse};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{CouchDbClient, doc_path, error::ClientError, http::check_response, query::ViewQuery};

impl CouchDbClient {
    fn view_path(design: &str, view: &str) -> String {
        format!(
            "{}/_view/{}",
            doc_path(&design_id(design)),
            urlencoding::encode(view)
        )
    }

    /// `GET` the view, or `POST` when the query carries `keys`.
    async fn fetch_view(&self, path: &str, query: &ViewQuery) -> Result<reqwest::Response, ClientError> {
        let url = format!("{path}{}", query.to_query_string()?);
        let builder = match &query.keys {
            Some(keys) => self.request(Method::POST, &url).json(&json!({ "keys": keys })),
            None => self.request(Method::GET, &url),
        };
        check_response(builder.send().await?, path).await
    }

    /// Query a view without reduction (or with whatever `query.reduce` says).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown design document or
    /// view, and decoding errors when rows do not match `K`, `V`, `D`.
    pub async fn query_view<K, V, D>(
        &self,
        design: &str,
        view: &str,
        query: &ViewQuery,
    ) -> Result<ViewQueryResponse<K, V, D>, ClientError>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
        D: DeserializeOwned,
    {
        let path = self.db_path(&Self::view_path(design, view));
        let resp = self.fetch_view(&path, query).await?;
        let data: ViewQueryResponse<K, V, D> = resp.json().await?;
        tracing::debug!(design, view, rows = data.rows.len(), total_rows = ?data.total_rows, "view query");
        Ok(data)
    }

    /// Query a view with `reduce=true`.
    ///
    /// # Errors
    ///
    /// As [`query_view`](Self::query_view); a view without reduce function
    /// is rejected by the server.
    pub async fn query_reduced_view<K, V>(
        &self,
        design: &str,
        view: &str,
        query: &ViewQuery,
    ) -> Result<ReducedViewQueryResponse<K, V>, ClientError>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        let query = query.clone().reduce(true);
        let path = self.db_path(&Self::view_path(design, view));
        let resp = self.fetch_view(&path, &query).await?;
        let data: ReducedViewQueryResponse<K, V> = resp.json().await?;
        tracing::debug!(design, view, rows = data.rows.len(), "reduced view query");
        Ok(data)
    }

    /// Query `_all_docs` of the bound database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, server or decoding errors.
    pub async fn all_docs<D: DeserializeOwned>(
        &self,
        query: &ViewQuery,
    ) -> Result<AllDocsResponse<D>, ClientError> {
        let path = self.db_path("_all_docs");
        let resp = self.fetch_view(&path, query).await?;
        let data: AllDocsResponse<D> = resp.json().await?;
        tracing::debug!(rows = data.rows.len(), total_rows = ?data.total_rows, "all_docs query");
        Ok(data)
    }
}
