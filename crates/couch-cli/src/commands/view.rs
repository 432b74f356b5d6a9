use couch_client::{CouchDbClient, ViewQuery};
use couch_config::CouchConfig;
use couch_core::{AllDocsResponse, ReducedViewQueryResponse, ViewQueryResponse};
use serde::Serialize;
use serde_json::Value;

use crate::cli::root_commands::{AllDocsArgs, ViewArgs, paging};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::input::parse_key;
use crate::commands::shared::pages::collect_rows;
use crate::output::output;

fn base_query(key: Option<&str>, start_key: Option<&str>, end_key: Option<&str>) -> ViewQuery {
    let mut query = ViewQuery::new();
    if let Some(key) = key {
        query = query.key(parse_key(key));
    }
    if let Some(start) = start_key {
        query = query.start_key(parse_key(start));
    }
    if let Some(end) = end_key {
        query = query.end_key(parse_key(end));
    }
    query
}

/// Tables show rows only; JSON keeps the response envelope.
fn output_response<T: Serialize, R: Serialize>(response: &T, rows: &R, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.format == OutputFormat::Table {
        output(rows, flags.format)
    } else {
        output(response, flags.format)
    }
}

/// Handle `couchdb view`.
pub async fn handle_view(
    args: &ViewArgs,
    client: &CouchDbClient,
    config: &CouchConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut query = base_query(args.key.as_deref(), args.start_key.as_deref(), args.end_key.as_deref())
        .descending(args.descending);
    let page_size = paging(args.all, args.page_size, config.paging.page_size);

    if args.reduce {
        query = query.group(args.group);
        if let Some(level) = args.group_level {
            query = query.group_level(level);
        }
        if let Some(page_size) = page_size {
            let pager = client.reduced_view_pager::<Value, Value>(&args.design, &args.view, page_size, query)?;
            let rows = collect_rows(pager, args.limit, |page| page.rows).await?;
            return output(&rows, flags.format);
        }
        if let Some(limit) = args.limit {
            query = query.limit(limit);
        }
        let response: ReducedViewQueryResponse =
            client.query_reduced_view(&args.design, &args.view, &query).await?;
        return output_response(&response, &response.rows, flags);
    }

    query = query.reduce(false).include_docs(args.include_docs);
    if let Some(page_size) = page_size {
        let pager = client.view_pager::<Value, Value, Value>(&args.design, &args.view, page_size, query)?;
        let rows = collect_rows(pager, args.limit, |page| page.rows).await?;
        return output(&rows, flags.format);
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }
    let response: ViewQueryResponse = client.query_view(&args.design, &args.view, &query).await?;
    output_response(&response, &response.rows, flags)
}

/// Handle `couchdb all-docs`.
pub async fn handle_all_docs(
    args: &AllDocsArgs,
    client: &CouchDbClient,
    config: &CouchConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut query = base_query(None, args.start_key.as_deref(), args.end_key.as_deref())
        .include_docs(args.include_docs);

    if let Some(page_size) = paging(args.all, args.page_size, config.paging.page_size) {
        let pager = client.all_docs_pager::<Value>(page_size, query)?;
        let rows = collect_rows(pager, args.limit, |page| page.rows).await?;
        return output(&rows, flags.format);
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }
    let response: AllDocsResponse = client.all_docs(&query).await?;
    output_response(&response, &response.rows, flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn base_query_parses_keys() {
        let query = base_query(Some("Herbert"), Some("[\"a\"]"), Some("[\"a\", {}]"));
        assert_eq!(query.key, Some(json!("Herbert")));
        assert_eq!(query.start_key, Some(json!(["a"])));
        assert_eq!(query.end_key, Some(json!(["a", {}])));
    }

    #[test]
    fn base_query_without_keys_is_empty() {
        assert_eq!(base_query(None, None, None), ViewQuery::new());
    }
}
