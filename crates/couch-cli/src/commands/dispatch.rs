use couch_client::CouchDbClient;
use couch_config::CouchConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    client: &CouchDbClient,
    config: &CouchConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if config.database.create_if_missing && command.writes_documents() {
        client.ensure_db().await?;
    }

    match command {
        Commands::Health => commands::server::health(client, flags).await,
        Commands::Info => commands::server::info(client, flags).await,
        Commands::Uuids { count } => commands::server::uuids(client, count, flags).await,
        Commands::Dbs => commands::server::dbs(client, flags).await,
        Commands::Db { action } => commands::db::handle(&action, client, flags).await,
        Commands::Doc { action } => commands::doc::handle(&action, client, flags).await,
        Commands::Design { action } => commands::design::handle(&action, client, flags).await,
        Commands::View(args) => commands::view::handle_view(&args, client, config, flags).await,
        Commands::AllDocs(args) => commands::view::handle_all_docs(&args, client, config, flags).await,
        Commands::Changes(args) => commands::changes::handle(&args, client, flags).await,
    }
}
