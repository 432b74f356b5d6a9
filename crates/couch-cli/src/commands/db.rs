use couch_client::CouchDbClient;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DbCommands;
use crate::output::output;

/// Handle `couchdb db`.
pub async fn handle(
    action: &DbCommands,
    client: &CouchDbClient,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let database = client.database();
    match action {
        DbCommands::Exists => {
            let exists = client.contains_db().await?;
            output(&json!({"database": database, "exists": exists}), flags.format)
        }
        DbCommands::Create => {
            let created = client.create_db().await?;
            output(&json!({"database": database, "created": created}), flags.format)
        }
        DbCommands::Delete => {
            let deleted = client.delete_db().await?;
            output(&json!({"database": database, "deleted": deleted}), flags.format)
        }
        DbCommands::Info => output(&client.db_info().await?, flags.format),
    }
}
