use anyhow::Context;
use couch_client::CouchDbClient;
use couch_core::ViewDefinition;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DesignCommands;
use crate::output::output;

/// Handle `couchdb design`.
pub async fn handle(action: &DesignCommands, client: &CouchDbClient, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        DesignCommands::Get { name } => {
            let design = client
                .get_design_document(name)
                .await?
                .with_context(|| format!("design document {name} not found"))?;
            output(&design, flags.format)
        }
        DesignCommands::PutView {
            design,
            view,
            map,
            reduce,
        } => {
            let mut definition = ViewDefinition::map(map.as_str());
            if let Some(reduce) = reduce {
                definition = definition.with_reduce(reduce.as_str());
            }
            let updated = client.ensure_view(design, view, definition).await?;
            output(
                &json!({"design": design, "view": view, "updated": updated}),
                flags.format,
            )
        }
    }
}
