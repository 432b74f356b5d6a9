//! # couch-core
//!
//! Types shared by the CouchDB client crates.
//!
//! - Document traits and the schemaless [`MapDocument`]
//! - Design documents and view definitions
//! - `_changes` feed rows
//! - View query responses (plain, reduced, `_all_docs`) and paging cursors
//! - JSON helpers: query value encoding, nested revisions, ISO dates
//! - Cross-cutting error type

pub mod changes;
pub mod design;
pub mod document;
pub mod errors;
pub mod json;
pub mod view;

pub use changes::{ChangeRevision, ChangeRow, ChangesResponse};
pub use design::{DesignDocument, ViewDefinition};
pub use document::{BulkDocResult, CouchDbDocument, DocumentId, DocumentRevision, MapDocument};
pub use errors::CoreError;
pub use view::{
    AllDocsResponse, AllDocsRow, PageCursor, ReducedViewQueryResponse, ReducedViewRow,
    RowReference, ViewPage, ViewQueryResponse, ViewRow,
};
