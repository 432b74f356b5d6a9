use anyhow::Context;
use couch_client::CouchDbClient;
use couch_core::{CouchDbDocument, MapDocument};
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DocCommands;
use crate::commands::shared::input::{bulk_documents, read_json};
use crate::output::output;

/// Handle `couchdb doc`.
pub async fn handle(action: &DocCommands, client: &CouchDbClient, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        DocCommands::Get { id } => {
            let doc: Value = client
                .get_document(id)
                .await?
                .with_context(|| format!("document {id} not found in {}", client.database()))?;
            output(&doc, flags.format)
        }
        DocCommands::Create { body } => {
            let doc = read_json(body)?;
            output(&client.create_document(&doc).await?, flags.format)
        }
        DocCommands::Update { body } => {
            let doc = read_json(body)?;
            output(&client.update_document(&doc).await?, flags.format)
        }
        DocCommands::Delete { id, rev } => {
            let rev = match rev {
                Some(rev) => rev.clone(),
                None => current_revision(client, id).await?,
            };
            output(&client.delete_document(id, &rev).await?, flags.format)
        }
        DocCommands::Bulk { body } => {
            let docs = bulk_documents(read_json(body)?)?;
            let results = client.update_bulk(&docs).await?;
            let failed = results.iter().filter(|r| !r.is_ok()).count();
            output(&results, flags.format)?;
            if failed > 0 {
                anyhow::bail!("{failed} of {} documents were not written", results.len());
            }
            Ok(())
        }
    }
}

async fn current_revision(client: &CouchDbClient, id: &str) -> anyhow::Result<String> {
    let doc: MapDocument = client
        .get_document(id)
        .await?
        .with_context(|| format!("document {id} not found in {}", client.database()))?;
    doc.revision()
        .map(str::to_string)
        .with_context(|| format!("document {id} has no _rev"))
}
