use clap::Subcommand;

/// Document commands. Bodies are inline JSON or `@path` to a JSON file.
#[derive(Clone, Debug, Subcommand)]
pub enum DocCommands {
    /// Get a document by ID.
    Get { id: String },
    /// Create a document.
    Create { body: String },
    /// Update a document; the body must carry `_id` and `_rev`.
    Update { body: String },
    /// Delete a document. Without `--rev` the current revision is looked up.
    Delete {
        id: String,
        #[arg(long)]
        rev: Option<String>,
    },
    /// Write many documents through `_bulk_docs`.
    Bulk { body: String },
}
