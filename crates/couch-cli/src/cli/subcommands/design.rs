use clap::Subcommand;

/// Design document commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DesignCommands {
    /// Get a design document by name.
    Get { name: String },
    /// Create or replace a view, creating the design document when missing.
    PutView {
        design: String,
        view: String,
        /// JavaScript map function
        #[arg(long)]
        map: String,
        /// Reduce function or builtin such as `_count`
        #[arg(long)]
        reduce: Option<String>,
    },
}
