use clap::Subcommand;

/// Commands on the configured database.
#[derive(Clone, Debug, Subcommand)]
pub enum DbCommands {
    /// Whether the database exists.
    Exists,
    /// Create the database.
    Create,
    /// Delete the database and all its documents.
    Delete,
    /// Document counts and update sequence.
    Info,
}
