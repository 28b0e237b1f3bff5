//! Purge endpoint integration test
//!
//! Purge is not to be confused with document deletion: it removes the
//! document and its edit history from the local database instance.
//!
//! Needs a live CouchDB-compatible server. Point SOFASH_TEST_SERVER at it
//! and run `cargo test --test purge -- --ignored`. The test creates and
//! destroys the `sofash_test_purge` database.

use serde_json::{json, Value};

use sofash::http::{Client, Method, Response, TcpTransport};

const DB: &str = "sofash_test_purge";
const NUM_DOCS: i64 = 10;

fn client() -> Client {
    let server = std::env::var("SOFASH_TEST_SERVER")
        .expect("SOFASH_TEST_SERVER must point at a running server");
    Client::new(Box::new(TcpTransport::new()), server)
}

fn request(
    client: &mut Client,
    method: Method,
    path: &str,
    body: Option<&Value>,
) -> Response {
    let body = body.map(|b| b.to_string());
    client
        .request(method, path, body.as_deref())
        .expect("request failed")
}

fn get_json(
    client: &mut Client,
    path: &str,
) -> (u16, Value) {
    let response = request(client, Method::Get, path, None);
    let json = response.json().expect("body should be json");
    (response.status, json)
}

/// Sequence fields are numeric on classic servers and "N-opaque" strings
/// on newer ones; reduce both to N
fn seq_number(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().expect("integer sequence"),
        Value::String(s) => s
            .split('-')
            .next()
            .and_then(|n| n.parse().ok())
            .expect("sequence of the form N-opaque"),
        other => panic!("unexpected sequence value: {}", other),
    }
}

fn doc_rev(
    client: &mut Client,
    id: &str,
) -> String {
    let (status, doc) = get_json(client, &format!("/{}/{}", DB, id));
    assert_eq!(status, 200, "doc {} should exist", id);
    doc["_rev"].as_str().expect("_rev").to_string()
}

fn view_keys(
    client: &mut Client,
    view: &str,
) -> (i64, Vec<i64>) {
    let (status, body) = get_json(
        client,
        &format!("/{}/_design/test/_view/{}", DB, view),
    );
    assert_eq!(status, 200, "view {} should load", view);
    let keys = body["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .map(|row| row["key"].as_i64().expect("integer key"))
        .collect();
    (body["total_rows"].as_i64().expect("total_rows"), keys)
}

fn purge(
    client: &mut Client,
    body: Value,
) -> Value {
    let response = request(client, Method::Post, &format!("/{}/_purge", DB), Some(&body));
    // Classic servers answer 200, newer ones 201
    assert!(
        response.status == 200 || response.status == 201,
        "purge status was {}",
        response.status
    );
    response.json().expect("purge response json")
}

#[test]
#[ignore = "needs a live server (set SOFASH_TEST_SERVER)"]
fn test_purge_removes_documents_and_rebuilds_views() {
    let mut client = client();

    // Fresh database
    request(&mut client, Method::Delete, &format!("/{}", DB), None);
    let created = request(&mut client, Method::Put, &format!("/{}", DB), None);
    assert_eq!(created.status, 201, "create db");

    // Design doc with one view that emits every doc twice and one that
    // only sees doc "1"
    let design = json!({
        "_id": "_design/test",
        "language": "javascript",
        "views": {
            "all_docs_twice": {
                "map": "function(doc) { emit(doc.integer, null); emit(doc.integer, null) }"
            },
            "single_doc": {
                "map": "function(doc) { if (doc._id == \"1\") { emit(1, null) }}"
            }
        }
    });
    let saved = request(
        &mut client,
        Method::Put,
        &format!("/{}/_design/test", DB),
        Some(&design),
    );
    assert_eq!(saved.status, 201, "save design doc");

    // Bulk-save docs 1..=10
    let docs: Vec<Value> = (1..=NUM_DOCS)
        .map(|i| json!({"_id": i.to_string(), "integer": i, "string": i.to_string()}))
        .collect();
    let bulk = request(
        &mut client,
        Method::Post,
        &format!("/{}/_bulk_docs", DB),
        Some(&json!({ "docs": docs })),
    );
    assert_eq!(bulk.status, 201, "bulk save");

    // Validate the views before purging
    let (_, keys) = view_keys(&mut client, "all_docs_twice");
    for i in 0..NUM_DOCS {
        assert_eq!(keys[(2 * i) as usize], i + 1);
        assert_eq!(keys[(2 * i + 1) as usize], i + 1);
    }
    let (total, _) = view_keys(&mut client, "single_doc");
    assert_eq!(total, 1);

    let (_, info) = get_json(&mut client, &format!("/{}", DB));
    let rev1 = doc_rev(&mut client, "1");
    let rev2 = doc_rev(&mut client, "2");

    // Purge documents 1 and 2
    let result = purge(&mut client, json!({"1": [rev1.clone()], "2": [rev2.clone()]}));
    assert_eq!(result["purged"]["1"][0], json!(rev1));
    assert_eq!(result["purged"]["2"][0], json!(rev2));

    // Purging advances both sequences
    let (_, new_info) = get_json(&mut client, &format!("/{}", DB));
    assert_eq!(
        seq_number(&info["update_seq"]) + 1,
        seq_number(&new_info["update_seq"]),
        "purge increments update_seq"
    );
    assert_eq!(
        seq_number(&info["purge_seq"]) + 1,
        seq_number(&new_info["purge_seq"]),
        "purge increments purge_seq"
    );

    // The documents are gone
    let (status, _) = get_json(&mut client, &format!("/{}/1", DB));
    assert_eq!(status, 404);
    let (status, _) = get_json(&mut client, &format!("/{}/2", DB));
    assert_eq!(status, 404);

    // Views rebuild without the purged docs
    let (_, keys) = view_keys(&mut client, "all_docs_twice");
    for i in 2..NUM_DOCS {
        assert_eq!(keys[(2 * (i - 2)) as usize], i + 1);
        assert_eq!(keys[(2 * (i - 2) + 1) as usize], i + 1);
    }
    let (total, _) = view_keys(&mut client, "single_doc");
    assert_eq!(total, 0);

    // Purge twice in a row without loading views in between (forces a
    // full view rebuild)
    let rev3 = doc_rev(&mut client, "3");
    let rev4 = doc_rev(&mut client, "4");
    purge(&mut client, json!({"3": [rev3]}));
    purge(&mut client, json!({"4": [rev4]}));

    let (_, keys) = view_keys(&mut client, "all_docs_twice");
    for i in 4..NUM_DOCS {
        assert_eq!(keys[(2 * (i - 4)) as usize], i + 1);
        assert_eq!(keys[(2 * (i - 4) + 1) as usize], i + 1);
    }
    let (total, _) = view_keys(&mut client, "single_doc");
    assert_eq!(total, 0);
}
