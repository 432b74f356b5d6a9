//! Design document management.

use couch_core::design::design_id;
use couch_core::{DesignDocument, DocumentRevision, ViewDefinition};
use reqwest::Method;

use crate::{CouchDbClient, doc_path, error::ClientError, http::check_response};

impl CouchDbClient {
    /// Whether the design document exists. Accepts `name` or `_design/name`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures or unexpected statuses.
    pub async fn contains_design_document(&self, name: &str) -> Result<bool, ClientError> {
        self.contains_document(&design_id(name)).await
    }

    /// Fetch a design document, `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, server or decoding errors.
    pub async fn get_design_document(&self, name: &str) -> Result<Option<DesignDocument>, ClientError> {
        self.get_document(&design_id(name)).await
    }

    /// Create or update a design document. Updates need `rev` set.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Conflict`] when `rev` is stale or missing for an
    /// existing design document.
    pub async fn save_design_document(
        &self,
        design: &DesignDocument,
    ) -> Result<DocumentRevision, ClientError> {
        let path = self.db_path(&doc_path(&design.id));
        let resp = self.request(Method::PUT, &path).json(design).send().await?;
        let resp = check_response(resp, &self.resource(&design.id)).await?;
        let written: DocumentRevision = resp.json().await?;
        tracing::info!(id = %written.id, rev = %written.rev, "saved design document");
        Ok(written)
    }

    /// Make sure `design` contains `view` with the given definition.
    ///
    /// Creates the design document when missing, adds or replaces the view
    /// otherwise. Returns `false` when a view with the same map and reduce
    /// functions was already there. Members of the stored design document
    /// and view that are not modelled (`validate_doc_update`, `options`)
    /// are written back as they were.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when reading or writing the design document
    /// fails, including conflicts with concurrent writers.
    pub async fn ensure_view(
        &self,
        design: &str,
        view: &str,
        definition: ViewDefinition,
    ) -> Result<bool, ClientError> {
        let doc = match self.get_design_document(design).await? {
            Some(existing) if existing.view(view).is_some_and(|v| v.same_functions(&definition)) => {
                tracing::debug!(design, view, "view already up to date");
                return Ok(false);
            }
            Some(mut existing) => {
                let mut definition = definition;
                if let Some(stored) = existing.views.remove(view) {
                    for (member, value) in stored.other {
                        definition.other.entry(member).or_insert(value);
                    }
                }
                existing.views.insert(view.to_string(), definition);
                existing
            }
            None => DesignDocument::new(design).with_view(view, definition),
        };
        self.save_design_document(&doc).await?;
        Ok(true)
    }
}
