use couch_client::{ChangesQuery, CouchDbClient};
use couch_core::ChangesResponse;

use crate::cli::root_commands::ChangesArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Handle `couchdb changes`.
pub async fn handle(args: &ChangesArgs, client: &CouchDbClient, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = ChangesQuery {
        since: args.since.clone(),
        limit: args.limit,
        include_docs: args.include_docs,
        descending: args.descending,
        filter: args.filter.clone(),
    };
    let changes: ChangesResponse = client.changes(&query).await?;
    if flags.format == OutputFormat::Table {
        output(&changes.results, flags.format)
    } else {
        output(&changes, flags.format)
    }
}
