//! Views, design documents, `_all_docs` paging and the changes feed against
//! an in-process CouchDB double.

#![allow(clippy::unwrap_used, clippy::panic)]

use couch_client::{ChangesQuery, ClientError, CouchDbClient, ViewQuery};
use couch_core::{
    AllDocsResponse, ChangesResponse, DesignDocument, ReducedViewQueryResponse, ViewDefinition, ViewQueryResponse,
};
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, CouchDbClient) {
    let server = MockServer::start().await;
    let client = CouchDbClient::new(server.uri(), "books").unwrap();
    (server, client)
}

fn all_docs_row(id: &str) -> Value {
    json!({"id": id, "key": id, "value": {"rev": format!("1-{id}")}})
}

#[tokio::test]
async fn view_query_sends_encoded_parameters() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_design/library/_view/by_author"))
        .and(query_param("key", "\"Herbert\""))
        .and(query_param("include_docs", "true"))
        .and(query_param("reduce", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_rows": 3, "offset": 1,
            "rows": [{"id": "book-1", "key": "Herbert", "value": 1, "doc": {"_id": "book-1"}}]
        })))
        .mount(&server)
        .await;

    let query = ViewQuery::new().key("Herbert").include_docs(true).reduce(false);
    let response: ViewQueryResponse<String, u32> =
        client.query_view("library", "by_author", &query).await.unwrap();
    assert_eq!(response.offset, Some(1));
    assert_eq!(response.rows[0].value, Some(1));
    assert_eq!(response.rows[0].doc, Some(json!({"_id": "book-1"})));
}

#[tokio::test]
async fn view_query_with_keys_posts_them() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/books/_design/library/_view/by_author"))
        .and(body_json(json!({"keys": ["Austen", "Herbert"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_rows": 3, "offset": 0, "rows": []})))
        .mount(&server)
        .await;

    let query = ViewQuery::new().keys(["Austen", "Herbert"]);
    let response: ViewQueryResponse = client.query_view("library", "by_author", &query).await.unwrap();
    assert!(response.rows.is_empty());
}

#[tokio::test]
async fn reduced_view_forces_reduce() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_design/library/_view/by_author"))
        .and(query_param("reduce", "true"))
        .and(query_param("group", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{"key": "Austen", "value": 6}, {"key": "Herbert", "value": 2}]
        })))
        .mount(&server)
        .await;

    let response = client
        .query_reduced_view::<String, u64>("library", "by_author", &ViewQuery::new().group(true))
        .await
        .unwrap();
    let counts: Vec<(String, u64)> = response
        .rows
        .into_iter()
        .map(|r| (r.key.unwrap(), r.value.unwrap()))
        .collect();
    assert_eq!(counts, vec![("Austen".into(), 6), ("Herbert".into(), 2)]);
}

#[tokio::test]
async fn all_docs_pager_walks_every_page() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_all_docs"))
        .and(query_param_is_missing("startkey"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_rows": 5, "offset": 0,
            "rows": [all_docs_row("a"), all_docs_row("b"), all_docs_row("c")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/_all_docs"))
        .and(query_param("startkey", "\"c\""))
        .and(query_param("startkey_docid", "c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_rows": 5, "offset": 2,
            "rows": [all_docs_row("c"), all_docs_row("d"), all_docs_row("e")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/_all_docs"))
        .and(query_param("startkey", "\"e\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_rows": 5, "offset": 4,
            "rows": [all_docs_row("e")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pager = client.all_docs_pager::<Value>(2, ViewQuery::new()).unwrap();
    let pages: Vec<AllDocsResponse> = pager.into_stream().try_collect().await.unwrap();

    let ids: Vec<Vec<String>> = pages
        .iter()
        .map(|p| p.rows.iter().filter_map(|r| r.id.clone()).collect())
        .collect();
    assert_eq!(ids, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
    assert_eq!(pages[1].rows[0].rev.as_deref(), Some("1-c"));
}

#[tokio::test]
async fn reduced_view_pager_resumes_from_the_trailing_key() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_design/library/_view/by_author"))
        .and(query_param("reduce", "true"))
        .and(query_param("group", "true"))
        .and(query_param("limit", "3"))
        .and(query_param_is_missing("startkey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{"key": "a", "value": 4}, {"key": "b", "value": 1}, {"key": "c", "value": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/_design/library/_view/by_author"))
        .and(query_param("reduce", "true"))
        .and(query_param("startkey", "\"c\""))
        .and(query_param_is_missing("startkey_docid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{"key": "c", "value": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pager = client
        .reduced_view_pager::<String, u64>("library", "by_author", 2, ViewQuery::new().group(true))
        .unwrap();
    let pages: Vec<ReducedViewQueryResponse<String, u64>> = pager.into_stream().try_collect().await.unwrap();

    let keys: Vec<Vec<String>> = pages
        .iter()
        .map(|p| p.rows.iter().filter_map(|r| r.key.clone()).collect())
        .collect();
    assert_eq!(keys, vec![vec!["a", "b"], vec!["c"]]);
}

#[tokio::test]
async fn view_pager_surfaces_missing_view() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_design/library/_view/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "not_found", "reason": "missing_named_view"})),
        )
        .mount(&server)
        .await;

    let mut pager = client
        .view_pager::<String, Value, Value>("library", "missing", 10, ViewQuery::new())
        .unwrap();
    let err = pager.next_page().await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn ensure_view_creates_design_document() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_design/library"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not_found", "reason": "missing"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/books/_design/library"))
        .and(body_json(json!({
            "_id": "_design/library",
            "language": "javascript",
            "views": {"by_author": {"map": "function(doc) { emit(doc.author, 1); }", "reduce": "_count"}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"ok": true, "id": "_design/library", "rev": "1-d"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let definition = ViewDefinition::map("function(doc) { emit(doc.author, 1); }").with_reduce("_count");
    assert!(client.ensure_view("library", "by_author", definition).await.unwrap());
}

#[tokio::test]
async fn ensure_view_skips_identical_view() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_design/library"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "_design/library", "_rev": "3-e", "language": "javascript",
            "views": {"by_author": {"map": "function(doc) { emit(doc.author, 1); }"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let definition = ViewDefinition::map("function(doc) { emit(doc.author, 1); }");
    assert!(!client.ensure_view("library", "by_author", definition).await.unwrap());
}

#[tokio::test]
async fn ensure_view_adds_view_to_existing_design() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_design/library"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "_design/library", "_rev": "3-e",
            "views": {"by_author": {"map": "function(doc) { emit(doc.author, 1); }"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/books/_design/library"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"ok": true, "id": "_design/library", "rev": "4-f"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let definition = ViewDefinition::map("function(doc) { emit(doc.year, 1); }");
    assert!(client.ensure_view("library", "by_year", definition).await.unwrap());

    let requests = server.received_requests().await.unwrap();
    let saved: Value = requests.last().unwrap().body_json().unwrap();
    assert_eq!(saved["_rev"], "3-e");
    assert!(saved["views"]["by_author"].is_object());
    assert!(saved["views"]["by_year"].is_object());
}

#[tokio::test]
async fn ensure_view_keeps_unmodelled_design_members() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_design/library"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "_design/library", "_rev": "3-e", "language": "javascript",
            "validate_doc_update": "function(newDoc) { if (!newDoc.title) throw({forbidden: 'title'}); }",
            "updates": {"stamp": "function(doc, req) { return [doc, 'ok']; }"},
            "options": {"local_seq": true},
            "views": {
                "by_author": {"map": "function(doc) { emit(doc.author, 1); }", "options": {"collation": "raw"}}
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/books/_design/library"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"ok": true, "id": "_design/library", "rev": "4-f"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let definition = ViewDefinition::map("function(doc) { emit(doc.author, null); }").with_reduce("_count");
    assert!(client.ensure_view("library", "by_author", definition).await.unwrap());

    let requests = server.received_requests().await.unwrap();
    let saved: Value = requests.last().unwrap().body_json().unwrap();
    assert_eq!(
        saved,
        json!({
            "_id": "_design/library", "_rev": "3-e", "language": "javascript",
            "validate_doc_update": "function(newDoc) { if (!newDoc.title) throw({forbidden: 'title'}); }",
            "updates": {"stamp": "function(doc, req) { return [doc, 'ok']; }"},
            "options": {"local_seq": true},
            "views": {
                "by_author": {
                    "map": "function(doc) { emit(doc.author, null); }",
                    "reduce": "_count",
                    "options": {"collation": "raw"}
                }
            }
        })
    );
}

#[tokio::test]
async fn save_design_document_conflict_names_the_document() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/books/_design/library"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            json!({"error": "conflict", "reason": "Document update conflict."}),
        ))
        .mount(&server)
        .await;

    let design = DesignDocument::new("library").with_view("all", ViewDefinition::map("function(doc) { emit(doc._id); }"));
    let err = client.save_design_document(&design).await.unwrap_err();
    match err {
        ClientError::Conflict { resource, reason } => {
            assert_eq!(resource, "books/_design/library");
            assert_eq!(reason, "Document update conflict.");
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn changes_feed_in_normal_mode() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/books/_changes"))
        .and(query_param("feed", "normal"))
        .and(query_param("since", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"seq": "6-a", "id": "book-1", "changes": [{"rev": "2-b"}]},
                {"seq": "7-b", "id": "book-2", "changes": [{"rev": "3-c"}], "deleted": true}
            ],
            "last_seq": "7-b",
            "pending": 0
        })))
        .mount(&server)
        .await;

    let query = ChangesQuery {
        since: Some("5".into()),
        ..ChangesQuery::default()
    };
    let changes: ChangesResponse = client.changes(&query).await.unwrap();
    assert_eq!(changes.results.len(), 2);
    assert!(changes.results[1].deleted);
    assert_eq!(changes.results[0].current_rev(), Some("2-b"));
    assert_eq!(changes.last_seq, json!("7-b"));
}
