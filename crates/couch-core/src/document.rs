//! Document traits and the schemaless map document.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CoreError;

pub const ID_FIELD: &str = "_id";
pub const REV_FIELD: &str = "_rev";
pub const DELETED_FIELD: &str = "_deleted";
pub const DATE_CREATED_FIELD: &str = "dateCreated";
pub const DATE_UPDATED_FIELD: &str = "dateUpdated";

/// Anything that can name the document it represents.
pub trait DocumentId {
    fn id(&self) -> Option<&str>;
}

/// A stored document with revision and bookkeeping timestamps.
pub trait CouchDbDocument: DocumentId {
    fn revision(&self) -> Option<&str>;

    fn date_created(&self) -> Option<&str>;

    fn set_date_created(&mut self, timestamp: String);

    fn date_updated(&self) -> Option<&str>;

    fn set_date_updated(&mut self, timestamp: String);
}

/// A document without a fixed schema, backed by its JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapDocument(Map<String, Value>);

impl MapDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a document with the given `_id`.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(ID_FIELD.to_string(), Value::String(id.into()));
        Self(map)
    }

    /// Convert any serializable value into a map document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the value does not serialize to
    /// a JSON object.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self, CoreError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::Validation(format!(
                "a document must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn set_revision(&mut self, rev: impl Into<String>) {
        self.0.insert(REV_FIELD.to_string(), Value::String(rev.into()));
    }

    pub fn mark_deleted(&mut self) {
        self.0.insert(DELETED_FIELD.to_string(), Value::Bool(true));
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for MapDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl Deref for MapDocument {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MapDocument {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DocumentId for MapDocument {
    fn id(&self) -> Option<&str> {
        self.str_field(ID_FIELD)
    }
}

impl CouchDbDocument for MapDocument {
    fn revision(&self) -> Option<&str> {
        self.str_field(REV_FIELD)
    }

    fn date_created(&self) -> Option<&str> {
        self.str_field(DATE_CREATED_FIELD)
    }

    fn set_date_created(&mut self, timestamp: String) {
        self.0
            .insert(DATE_CREATED_FIELD.to_string(), Value::String(timestamp));
    }

    fn date_updated(&self) -> Option<&str> {
        self.str_field(DATE_UPDATED_FIELD)
    }

    fn set_date_updated(&mut self, timestamp: String) {
        self.0
            .insert(DATE_UPDATED_FIELD.to_string(), Value::String(timestamp));
    }
}

/// The `{"ok": true, "id": ..., "rev": ...}` answer to a document write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRevision {
    pub id: String,
    pub rev: String,
}

/// One entry of a `_bulk_docs` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDocResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub rev: Option<String>,
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BulkDocResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
