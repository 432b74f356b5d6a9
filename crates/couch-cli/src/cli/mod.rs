use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `couchdb` binary.
#[derive(Debug, Parser)]
#[command(name = "couchdb", version, about = "CouchDB command-line client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server URL, overrides `server.url`
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Database name, overrides `database.name`
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Username for basic auth
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Password for basic auth
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Extra TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            url: self.url.clone(),
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            config: self.config.clone(),
        }
    }
}
