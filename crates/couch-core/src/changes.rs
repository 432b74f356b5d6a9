//! `_changes` feed responses (normal feed).

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRevision {
    pub rev: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRow<D = Value> {
    /// Opaque sequence; a string on CouchDB 2+, a number on 1.x.
    pub seq: Value,
    pub id: String,
    #[serde(default)]
    pub changes: Vec<ChangeRevision>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<D>,
}

impl<D> ChangeRow<D> {
    /// The leaf revision reported first, if any.
    #[must_use]
    pub fn current_rev(&self) -> Option<&str> {
        self.changes.first().map(|c| c.rev.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangesResponse<D = Value> {
    #[serde(default = "Vec::new")]
    pub results: Vec<ChangeRow<D>>,
    pub last_seq: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<u64>,
}
