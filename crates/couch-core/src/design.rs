//! Design documents holding view and filter definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::DocumentId;

pub const DESIGN_PREFIX: &str = "_design/";

/// Qualify a design document name with the `_design/` prefix.
#[must_use]
pub fn design_id(name: &str) -> String {
    if name.starts_with(DESIGN_PREFIX) {
        name.to_string()
    } else {
        format!("{DESIGN_PREFIX}{name}")
    }
}

/// Map and optional reduce function of a single view.
///
/// `map` is a JavaScript source string for `javascript` design documents and
/// may be an object for other query languages. Members such as `options`
/// are kept in `other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub map: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ViewDefinition {
    #[must_use]
    pub fn map(source: impl Into<String>) -> Self {
        Self {
            map: Value::String(source.into()),
            reduce: None,
            other: Map::new(),
        }
    }

    /// Same map and reduce functions, ignoring any other members.
    #[must_use]
    pub fn same_functions(&self, other: &Self) -> bool {
        self.map == other.map && self.reduce == other.reduce
    }

    #[must_use]
    pub fn with_reduce(mut self, source: impl Into<String>) -> Self {
        self.reduce = Some(source.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub views: BTreeMap<String, ViewDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
    /// Members not modelled above (`validate_doc_update`, `updates`,
    /// `shows`, `options`, ...). Written back unchanged on save.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

fn default_language() -> String {
    "javascript".to_string()
}

impl DesignDocument {
    /// Create an empty design document. Accepts `name` or `_design/name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: design_id(name),
            rev: None,
            language: default_language(),
            views: BTreeMap::new(),
            filters: BTreeMap::new(),
            other: Map::new(),
        }
    }

    /// The name without the `_design/` prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.strip_prefix(DESIGN_PREFIX).unwrap_or(&self.id)
    }

    #[must_use]
    pub fn with_view(mut self, name: impl Into<String>, view: ViewDefinition) -> Self {
        self.views.insert(name.into(), view);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.filters.insert(name.into(), source.into());
        self
    }

    #[must_use]
    pub fn has_view(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    #[must_use]
    pub fn view(&self, name: &str) -> Option<&ViewDefinition> {
        self.views.get(name)
    }
}

impl DocumentId for DesignDocument {
    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn new_prefixes_the_id_once() {
        assert_eq!(DesignDocument::new("books").id, "_design/books");
        assert_eq!(DesignDocument::new("_design/books").id, "_design/books");
        assert_eq!(DesignDocument::new("_design/books").name(), "books");
    }

    #[test]
    fn serializes_views_and_omits_empty_sections() {
        let doc = DesignDocument::new("books").with_view(
            "by_author",
            ViewDefinition::map("function(doc) { emit(doc.author, null); }")
                .with_reduce("_count"),
        );
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "_id": "_design/books",
                "language": "javascript",
                "views": {
                    "by_author": {
                        "map": "function(doc) { emit(doc.author, null); }",
                        "reduce": "_count"
                    }
                }
            })
        );
    }

    #[test]
    fn deserializes_stored_design_document() {
        let doc: DesignDocument = serde_json::from_value(json!({
            "_id": "_design/books",
            "_rev": "3-abc",
            "views": {"all": {"map": "function(doc) { emit(doc._id); }"}},
            "filters": {"recent": "function(doc, req) { return true; }"}
        }))
        .unwrap();
        assert_eq!(doc.rev.as_deref(), Some("3-abc"));
        assert_eq!(doc.language, "javascript");
        assert!(doc.has_view("all"));
        assert!(!doc.has_view("missing"));
        assert_eq!(doc.view("all").unwrap().reduce, None);
        assert_eq!(doc.filters.len(), 1);
        assert!(doc.other.is_empty());
    }

    #[test]
    fn unmodelled_members_survive_a_round_trip() {
        let stored = json!({
            "_id": "_design/books",
            "_rev": "4-def",
            "language": "javascript",
            "validate_doc_update": "function(newDoc, oldDoc, userCtx) {}",
            "options": {"partitioned": false},
            "views": {
                "all": {"map": "function(doc) { emit(doc._id); }", "options": {"collation": "raw"}}
            }
        });
        let doc: DesignDocument = serde_json::from_value(stored.clone()).unwrap();
        assert!(doc.other.contains_key("validate_doc_update"));
        assert_eq!(doc.view("all").unwrap().other["options"], json!({"collation": "raw"}));
        assert_eq!(serde_json::to_value(&doc).unwrap(), stored);
    }

    #[test]
    fn object_valued_map_is_accepted() {
        let doc: DesignDocument = serde_json::from_value(json!({
            "_id": "_design/mango",
            "language": "query",
            "views": {"by_name": {"map": {"fields": {"name": "asc"}}, "reduce": "_count"}}
        }))
        .unwrap();
        assert_eq!(doc.view("by_name").unwrap().map, json!({"fields": {"name": "asc"}}));
    }

    #[test]
    fn same_functions_ignores_options() {
        let mut stored = ViewDefinition::map("function(doc) {}").with_reduce("_count");
        stored.other.insert("options".into(), json!({"collation": "raw"}));
        let wanted = ViewDefinition::map("function(doc) {}").with_reduce("_count");
        assert!(stored.same_functions(&wanted));
        assert!(!stored.same_functions(&ViewDefinition::map("function(doc) {}")));
    }
}
