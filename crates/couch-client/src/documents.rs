//! Document CRUD and bulk operations.
//!
//! Writes stamp bookkeeping timestamps: `dateCreated` on create (unless the
//! caller already set one), `dateUpdated` on every update.

use couch_core::document::{ID_FIELD, REV_FIELD};
use couch_core::json::timestamp_now;
use couch_core::{BulkDocResult, CoreError, CouchDbDocument, DocumentId, DocumentRevision, MapDocument};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{CouchDbClient, doc_path, error::ClientError, http::check_response};

impl CouchDbClient {
    pub(crate) fn resource(&self, id: &str) -> String {
        format!("{}/{id}", self.database)
    }

    /// Whether a document with `id` exists.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures and statuses other
    /// than 200 and 404.
    pub async fn contains_document(&self, id: &str) -> Result<bool, ClientError> {
        let path = self.db_path(&doc_path(id));
        let resp = self.request(Method::HEAD, &path).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_response(resp, &self.resource(id)).await?;
        Ok(true)
    }

    /// Fetch a document, `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures, error statuses other
    /// than 404, or a body that does not decode into `T`.
    pub async fn get_document<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, ClientError> {
        let path = self.db_path(&doc_path(id));
        let resp = self.request(Method::GET, &path).send().await?;
        match check_response(resp, &self.resource(id)).await {
            Ok(resp) => Ok(Some(resp.json().await?)),
            Err(ClientError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Store a new document.
    ///
    /// With an `_id` the document is `PUT` under that id, otherwise the
    /// server assigns one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] when the document already
    /// carries a `_rev`, [`ClientError::Core`] when it is not a JSON object,
    /// and [`ClientError::Conflict`] when the id is taken.
    pub async fn create_document<T: Serialize + ?Sized>(
        &self,
        document: &T,
    ) -> Result<DocumentRevision, ClientError> {
        let mut doc = MapDocument::from_serializable(document)?;
        if doc.revision().is_some() {
            return Err(ClientError::InvalidArgument(format!(
                "document {} already has a revision; use update_document",
                doc.id().unwrap_or("<new>")
            )));
        }
        if doc.date_created().is_none() {
            doc.set_date_created(timestamp_now());
        }

        let (builder, resource) = match doc.id() {
            Some(id) => (
                self.request(Method::PUT, &self.db_path(&doc_path(id))),
                self.resource(id),
            ),
            None => (self.request(Method::POST, &self.db_path("")), self.database.clone()),
        };
        let resp = check_response(builder.json(&doc).send().await?, &resource).await?;
        let written: DocumentRevision = resp.json().await?;
        tracing::debug!(id = %written.id, rev = %written.rev, "created document");
        Ok(written)
    }

    /// Store a new revision of an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Core`] when `_id` or `_rev` is missing and
    /// [`ClientError::Conflict`] when `_rev` is not the current revision.
    pub async fn update_document<T: Serialize + ?Sized>(
        &self,
        document: &T,
    ) -> Result<DocumentRevision, ClientError> {
        let mut doc = MapDocument::from_serializable(document)?;
        let id = doc
            .id()
            .ok_or_else(|| CoreError::MissingField {
                field: ID_FIELD.into(),
            })?
            .to_string();
        if doc.revision().is_none() {
            return Err(CoreError::MissingField {
                field: REV_FIELD.into(),
            }
            .into());
        }
        doc.set_date_updated(timestamp_now());

        let path = self.db_path(&doc_path(&id));
        let resp = self.request(Method::PUT, &path).json(&doc).send().await?;
        let resp = check_response(resp, &self.resource(&id)).await?;
        let written: DocumentRevision = resp.json().await?;
        tracing::debug!(id = %written.id, rev = %written.rev, "updated document");
        Ok(written)
    }

    /// Delete revision `rev` of document `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Conflict`] for a stale revision and
    /// [`ClientError::NotFound`] for an unknown document.
    pub async fn delete_document(&self, id: &str, rev: &str) -> Result<DocumentRevision, ClientError> {
        let path = format!(
            "{}?rev={}",
            self.db_path(&doc_path(id)),
            urlencoding::encode(rev)
        );
        let resp = self.request(Method::DELETE, &path).send().await?;
        let resp = check_response(resp, &self.resource(id)).await?;
        Ok(resp.json().await?)
    }

    /// Write many documents in one `_bulk_docs` request.
    ///
    /// Per-document failures (e.g. conflicts) come back as entries with an
    /// `error`; they do not fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Core`] when an entry is not a JSON object, or
    /// any transport or server error for the request as a whole.
    pub async fn update_bulk<T: Serialize>(&self, documents: &[T]) -> Result<Vec<BulkDocResult>, ClientError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let docs = documents
            .iter()
            .map(MapDocument::from_serializable)
            .collect::<Result<Vec<_>, _>>()?;
        self.post_bulk(&docs).await
    }

    /// Delete many documents, given as `(id, rev)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport or server errors.
    pub async fn delete_bulk(&self, revisions: &[(String, String)]) -> Result<Vec<BulkDocResult>, ClientError> {
        if revisions.is_empty() {
            return Ok(Vec::new());
        }
        let docs: Vec<MapDocument> = revisions
            .iter()
            .map(|(id, rev)| {
                let mut doc = MapDocument::with_id(id.as_str());
                doc.set_revision(rev.as_str());
                doc.mark_deleted();
                doc
            })
            .collect();
        self.post_bulk(&docs).await
    }

    async fn post_bulk(&self, docs: &[MapDocument]) -> Result<Vec<BulkDocResult>, ClientError> {
        let path = self.db_path("_bulk_docs");
        let resp = self
            .request(Method::POST, &path)
            .json(&json!({ "docs": docs }))
            .send()
            .await?;
        let resp = check_response(resp, &path).await?;
        let results: Vec<BulkDocResult> = resp.json().await?;

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        if failed > 0 {
            tracing::warn!(database = %self.database, total = results.len(), failed, "bulk write had failures");
        }
        Ok(results)
    }
}
