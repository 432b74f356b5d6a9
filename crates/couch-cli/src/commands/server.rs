use couch_client::CouchDbClient;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `couchdb health`. Fails when the server is not healthy.
pub async fn health(client: &CouchDbClient, flags: &GlobalFlags) -> anyhow::Result<()> {
    let healthy = client.health_check().await;
    output(&json!({"url": client.base_url(), "healthy": healthy}), flags.format)?;
    if !healthy {
        anyhow::bail!("couchdb at {} is not healthy", client.base_url());
    }
    Ok(())
}

pub async fn info(client: &CouchDbClient, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&client.server_info().await?, flags.format)
}

pub async fn uuids(client: &CouchDbClient, count: usize, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&client.uuids(count).await?, flags.format)
}

pub async fn dbs(client: &CouchDbClient, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&client.all_dbs().await?, flags.format)
}
