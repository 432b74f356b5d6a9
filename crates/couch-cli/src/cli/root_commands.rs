use clap::{Args, Subcommand};

use crate::cli::subcommands::{DbCommands, DesignCommands, DocCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Check that the server answers with its welcome document.
    Health,
    /// Server version and vendor.
    Info,
    /// Fetch server-generated UUIDs.
    Uuids {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// List all databases.
    Dbs,
    /// Database management.
    Db {
        #[command(subcommand)]
        action: DbCommands,
    },
    /// Documents.
    Doc {
        #[command(subcommand)]
        action: DocCommands,
    },
    /// Design documents.
    Design {
        #[command(subcommand)]
        action: DesignCommands,
    },
    /// Query a view.
    View(ViewArgs),
    /// Query `_all_docs`.
    AllDocs(AllDocsArgs),
    /// Read the changes feed.
    Changes(ChangesArgs),
}

impl Commands {
    /// Whether the command operates on the configured database.
    #[must_use]
    pub const fn requires_database(&self) -> bool {
        !matches!(
            self,
            Self::Health | Self::Info | Self::Uuids { .. } | Self::Dbs
        )
    }

    /// Whether the command writes documents into the configured database.
    #[must_use]
    pub const fn writes_documents(&self) -> bool {
        matches!(
            self,
            Self::Doc {
                action: DocCommands::Create { .. } | DocCommands::Update { .. } | DocCommands::Bulk { .. }
            } | Self::Design {
                action: DesignCommands::PutView { .. }
            }
        )
    }
}

/// Arguments for `couchdb view`.
#[derive(Clone, Debug, Args)]
pub struct ViewArgs {
    /// Design document name, with or without `_design/`.
    pub design: String,
    pub view: String,
    /// Exact key (JSON; bare words are taken as strings)
    #[arg(long)]
    pub key: Option<String>,
    #[arg(long)]
    pub start_key: Option<String>,
    #[arg(long)]
    pub end_key: Option<String>,
    /// Maximum number of rows
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub include_docs: bool,
    #[arg(long)]
    pub descending: bool,
    /// Query the reduce function
    #[arg(long)]
    pub reduce: bool,
    /// Group reduced rows by key
    #[arg(long, requires = "reduce")]
    pub group: bool,
    #[arg(long, requires = "reduce")]
    pub group_level: Option<u32>,
    /// Fetch every page instead of a single response
    #[arg(long)]
    pub all: bool,
    /// Rows per page, implies `--all` (default `paging.page_size`)
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Arguments for `couchdb all-docs`.
#[derive(Clone, Debug, Args)]
pub struct AllDocsArgs {
    #[arg(long)]
    pub include_docs: bool,
    #[arg(long)]
    pub start_key: Option<String>,
    #[arg(long)]
    pub end_key: Option<String>,
    #[arg(long)]
    pub limit: Option<usize>,
    /// Fetch every page instead of a single response
    #[arg(long)]
    pub all: bool,
    /// Rows per page, implies `--all` (default `paging.page_size`)
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Page size when paging was asked for, `None` for a single request.
#[must_use]
pub fn paging(all: bool, page_size: Option<usize>, default: usize) -> Option<usize> {
    page_size.or_else(|| all.then_some(default))
}

/// Arguments for `couchdb changes`.
#[derive(Clone, Debug, Args)]
pub struct ChangesArgs {
    /// Start after this sequence (`now` for new changes only)
    #[arg(long)]
    pub since: Option<String>,
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub include_docs: bool,
    #[arg(long)]
    pub descending: bool,
    /// Filter function as `design/filter`
    #[arg(long)]
    pub filter: Option<String>,
}
