//! View query responses and the row references used for paging.
//!
//! CouchDB answers view queries in three shapes:
//! - a plain (map-only or `reduce=false`) view: `offset`, `total_rows`, rows
//!   with `id`, `key`, `value` and an optional `doc`
//! - a reduced view: rows with `key` and `value` only
//! - `_all_docs`: like a plain view, with the revision nested in `value.rev`
//!
//! Every row can act as a [`RowReference`], which is what a pager needs to
//! resume a query after it.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::DocumentId;
use crate::json::nested_revision;

/// A row position in a view: its key and, when the row stems from a
/// document, the document id.
pub trait RowReference<K> {
    fn key(&self) -> Option<&K>;

    fn doc_id(&self) -> Option<&str>;
}

/// Render a row reference for log lines: `key=…, docId=…` or `null`.
#[must_use]
pub fn describe<K: Debug, R: RowReference<K>>(row: Option<&R>) -> String {
    match row {
        None => "null".to_string(),
        Some(row) => format!(
            "key={}, docId={}",
            row.key().map_or_else(|| "null".to_string(), |k| format!("{k:?}")),
            row.doc_id().unwrap_or("null")
        ),
    }
}

/// Where the next page of a view starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor<K> {
    pub key: Option<K>,
    pub doc_id: Option<String>,
}

impl<K> RowReference<K> for PageCursor<K> {
    fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }
}

/// A page of view rows that can hand its trailing row to a pager.
pub trait ViewPage {
    type Key;

    fn row_count(&self) -> usize;

    /// Remove the last row and return it as a cursor.
    fn take_trailing(&mut self) -> Option<PageCursor<Self::Key>>;

    /// `(total_rows, offset)` for non-reduced results, `None` when reduced.
    fn totals(&self) -> Option<(Option<u64>, Option<u64>)>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow<K = Value, V = Value, D = Value> {
    #[serde(default)]
    pub id: Option<String>,
    pub key: Option<K>,
    pub value: Option<V>,
    /// Present when queried with `include_docs=true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<D>,
}

impl<K, V, D> RowReference<K> for ViewRow<K, V, D> {
    fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    fn doc_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl<K, V, D> DocumentId for ViewRow<K, V, D> {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedViewRow<K = Value, V = Value> {
    pub key: Option<K>,
    pub value: Option<V>,
}

impl<K, V> RowReference<K> for ReducedViewRow<K, V> {
    fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    fn doc_id(&self) -> Option<&str> {
        None
    }
}

/// A row of `_all_docs`. Lookups by `keys` yield rows with an `error`
/// instead of an `id` for unknown documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllDocsRow<D = Value> {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "value", default, with = "nested_revision")]
    pub rev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<D> PartialEq for AllDocsRow<D> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.key == other.key && self.rev == other.rev
    }
}

impl<D> RowReference<String> for AllDocsRow<D> {
    fn key(&self) -> Option<&String> {
        self.key.as_ref()
    }

    fn doc_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewQueryResponse<K = Value, V = Value, D = Value> {
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_seq: Option<Value>,
    #[serde(default = "Vec::new")]
    pub rows: Vec<ViewRow<K, V, D>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedViewQueryResponse<K = Value, V = Value> {
    #[serde(default = "Vec::new")]
    pub rows: Vec<ReducedViewRow<K, V>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllDocsResponse<D = Value> {
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_seq: Option<Value>,
    #[serde(default = "Vec::new")]
    pub rows: Vec<AllDocsRow<D>>,
}

fn cursor_of<K, R: RowReference<K>>(row: R) -> PageCursor<K>
where
    K: Clone,
{
    PageCursor {
        key: row.key().cloned(),
        doc_id: row.doc_id().map(str::to_string),
    }
}

impl<K: Clone, V, D> ViewPage for ViewQueryResponse<K, V, D> {
    type Key = K;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn take_trailing(&mut self) -> Option<PageCursor<K>> {
        self.rows.pop().map(cursor_of)
    }

    fn totals(&self) -> Option<(Option<u64>, Option<u64>)> {
        Some((self.total_rows, self.offset))
    }
}

impl<K: Clone, V> ViewPage for ReducedViewQueryResponse<K, V> {
    type Key = K;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn take_trailing(&mut self) -> Option<PageCursor<K>> {
        self.rows.pop().map(cursor_of)
    }

    fn totals(&self) -> Option<(Option<u64>, Option<u64>)> {
        None
    }
}

impl<D> ViewPage for AllDocsResponse<D> {
    type Key = String;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn take_trailing(&mut self) -> Option<PageCursor<String>> {
        self.rows.pop().map(cursor_of)
    }

    fn totals(&self) -> Option<(Option<u64>, Option<u64>)> {
        Some((self.total_rows, self.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MapDocument;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn describe_renders_null_and_cursor() {
        assert_eq!(describe::<String, PageCursor<String>>(None), "null");
        let cursor = PageCursor {
            key: Some("k".to_string()),
            doc_id: Some("d".to_string()),
        };
        assert_eq!(describe(Some(&cursor)), r#"key="k", docId=d"#);

        let reduced = PageCursor::<String> {
            key: None,
            doc_id: None,
        };
        assert_eq!(describe(Some(&reduced)), "key=null, docId=null");
    }

    #[test]
    fn all_docs_row_reads_nested_revision() {
        let response: AllDocsResponse<MapDocument> = serde_json::from_value(json!({
            "total_rows": 2,
            "offset": 0,
            "rows": [
                {"id": "a", "key": "a", "value": {"rev": "1-a"}, "doc": {"_id": "a", "_rev": "1-a"}},
                {"key": "missing", "error": "not_found"}
            ]
        }))
        .unwrap();

        assert_eq!(response.rows.len(), 2);
        let first = &response.rows[0];
        assert_eq!(first.rev.as_deref(), Some("1-a"));
        assert_eq!(first.doc.as_ref().and_then(DocumentId::id), Some("a"));
        assert_eq!(response.rows[1].error.as_deref(), Some("not_found"));
        assert_eq!(response.rows[1].id, None);
    }

    #[test]
    fn all_docs_row_equality_ignores_doc() {
        let a: AllDocsRow = serde_json::from_value(json!({
            "id": "x", "key": "x", "value": {"rev": "1-x"}, "doc": {"n": 1}
        }))
        .unwrap();
        let b: AllDocsRow = serde_json::from_value(json!({
            "id": "x", "key": "x", "value": {"rev": "1-x"}, "doc": {"n": 2}
        }))
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn view_response_with_complex_keys() {
        let mut response: ViewQueryResponse<Vec<String>, u32> = serde_json::from_value(json!({
            "total_rows": 3,
            "offset": 1,
            "update_seq": "12-g1AAAA",
            "rows": [
                {"id": "1", "key": ["a", "b"], "value": 1},
                {"id": "2", "key": ["a", "c"], "value": 2}
            ]
        }))
        .unwrap();

        assert_eq!(response.totals(), Some((Some(3), Some(1))));
        assert_eq!(response.update_seq, Some(json!("12-g1AAAA")));

        let cursor = response.take_trailing().unwrap();
        assert_eq!(cursor.key, Some(vec!["a".to_string(), "c".to_string()]));
        assert_eq!(cursor.doc_id.as_deref(), Some("2"));
        assert_eq!(response.row_count(), 1);
    }

    #[test]
    fn reduced_rows_have_no_doc_id() {
        let mut response: ReducedViewQueryResponse<String, u64> = serde_json::from_value(json!({
            "rows": [{"key": "alice", "value": 3}, {"key": "bob", "value": 5}]
        }))
        .unwrap();
        assert_eq!(response.totals(), None);
        assert_eq!(response.rows[0].doc_id(), None);

        let cursor = response.take_trailing().unwrap();
        assert_eq!(cursor.key.as_deref(), Some("bob"));
        assert_eq!(cursor.doc_id, None);
    }

    #[test]
    fn null_keys_are_accepted() {
        let response: ViewQueryResponse<String> = serde_json::from_value(json!({
            "rows": [{"id": "1", "key": null, "value": null}]
        }))
        .unwrap();
        assert_eq!(response.rows[0].key, None);
        assert_eq!(response.offset, None);
    }

    #[test]
    fn empty_page_has_no_trailing_row() {
        let mut response = AllDocsResponse::<Value> {
            offset: Some(0),
            total_rows: Some(0),
            update_seq: None,
            rows: Vec::new(),
        };
        assert_eq!(response.take_trailing(), None);
    }
}
