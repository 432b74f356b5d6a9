//! View query parameters.

use couch_core::json::encode_query_value;
use couch_core::{CoreError, PageCursor};
use serde::Serialize;
use serde_json::Value;

/// Parameters of a view or `_all_docs` query.
///
/// Keys are arbitrary JSON; they are JSON-encoded and then percent-encoded
/// when the query string is built. `keys` is sent as a `POST` body instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    pub key: Option<Value>,
    pub keys: Option<Vec<Value>>,
    pub start_key: Option<Value>,
    pub start_key_doc_id: Option<String>,
    pub end_key: Option<Value>,
    pub end_key_doc_id: Option<String>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
    pub descending: bool,
    pub include_docs: bool,
    pub reduce: Option<bool>,
    pub group: bool,
    pub group_level: Option<u32>,
    pub inclusive_end: Option<bool>,
    pub update_seq: bool,
}

impl ViewQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<Value>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Value>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn start_key(mut self, key: impl Into<Value>) -> Self {
        self.start_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn start_key_doc_id(mut self, id: impl Into<String>) -> Self {
        self.start_key_doc_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn end_key(mut self, key: impl Into<Value>) -> Self {
        self.end_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn end_key_doc_id(mut self, id: impl Into<String>) -> Self {
        self.end_key_doc_id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    #[must_use]
    pub const fn descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    #[must_use]
    pub const fn include_docs(mut self, include_docs: bool) -> Self {
        self.include_docs = include_docs;
        self
    }

    #[must_use]
    pub const fn reduce(mut self, reduce: bool) -> Self {
        self.reduce = Some(reduce);
        self
    }

    #[must_use]
    pub const fn group(mut self, group: bool) -> Self {
        self.group = group;
        self
    }

    #[must_use]
    pub const fn group_level(mut self, level: u32) -> Self {
        self.group_level = Some(level);
        self
    }

    #[must_use]
    pub const fn inclusive_end(mut self, inclusive: bool) -> Self {
        self.inclusive_end = Some(inclusive);
        self
    }

    #[must_use]
    pub const fn update_seq(mut self, update_seq: bool) -> Self {
        self.update_seq = update_seq;
        self
    }

    /// Continue after `cursor`, fetching `limit` rows.
    ///
    /// `skip` is dropped: the cursor already positions the query.
    pub fn resume_from<K: Serialize>(
        mut self,
        cursor: Option<&PageCursor<K>>,
        limit: usize,
    ) -> Result<Self, CoreError> {
        if let Some(cursor) = cursor {
            self.start_key = Some(serde_json::to_value(&cursor.key)?);
            self.start_key_doc_id.clone_from(&cursor.doc_id);
        }
        self.skip = None;
        self.limit = Some(limit);
        Ok(self)
    }

    /// Query parameters in a stable order, values not yet percent-encoded.
    pub fn to_pairs(&self) -> Result<Vec<(&'static str, String)>, CoreError> {
        let mut pairs = Vec::new();
        if let Some(key) = &self.key {
            pairs.push(("key", encode_query_value(key)?));
        }
        if let Some(start_key) = &self.start_key {
            pairs.push(("startkey", encode_query_value(start_key)?));
        }
        if let Some(id) = &self.start_key_doc_id {
            pairs.push(("startkey_docid", id.clone()));
        }
        if let Some(end_key) = &self.end_key {
            pairs.push(("endkey", encode_query_value(end_key)?));
        }
        if let Some(id) = &self.end_key_doc_id {
            pairs.push(("endkey_docid", id.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if self.descending {
            pairs.push(("descending", "true".into()));
        }
        if self.include_docs {
            pairs.push(("include_docs", "true".into()));
        }
        if let Some(reduce) = self.reduce {
            pairs.push(("reduce", reduce.to_string()));
        }
        if self.group {
            pairs.push(("group", "true".into()));
        }
        if let Some(level) = self.group_level {
            pairs.push(("group_level", level.to_string()));
        }
        if let Some(inclusive) = self.inclusive_end {
            pairs.push(("inclusive_end", inclusive.to_string()));
        }
        if self.update_seq {
            pairs.push(("update_seq", "true".into()));
        }
        Ok(pairs)
    }

    /// `?a=1&b=2`, or an empty string without parameters.
    pub fn to_query_string(&self) -> Result<String, CoreError> {
        Ok(encode_pairs(&self.to_pairs()?))
    }
}

pub(crate) fn encode_pairs(pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let joined = pairs
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{joined}")
}
