// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use mongodb::bson::doc;
use ty_core::QueueId;

fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

#[test]
fn sanitize_query_scopes_to_queue_id() {
    let queue_id = QueueId::new();
    let got = sanitize_query(&queue_id, QueryFilter::default()).unwrap();
    assert_eq!(got, doc! { "queue_id": queue_id.as_str() });
}

#[test]
fn sanitize_query_conjuncts_native_filter() {
    let queue_id = QueueId::new();
    let filter = QueryFilter::Native(doc! { "status": "PENDING" });
    let got = sanitize_query(&queue_id, filter).unwrap();
    assert_eq!(
        got,
        doc! { "$and": [
            { "queue_id": queue_id.as_str() },
            { "status": "PENDING" },
        ]}
    );
}

#[test]
fn sanitize_query_parses_expr_filter() {
    let queue_id = QueueId::new();
    let filter = QueryFilter::Expr("priority > 5".to_string());
    let got = sanitize_query(&queue_id, filter).unwrap();
    assert_eq!(
        got,
        doc! { "$and": [
            { "queue_id": queue_id.as_str() },
            { "priority": { "$gt": 5i64 } },
        ]}
    );
}

#[test]
fn sanitize_query_rejects_where_operator() {
    let queue_id = QueueId::new();
    let filter = QueryFilter::Native(doc! { "$where": "this.a == this.b" });
    assert!(sanitize_query(&queue_id, filter).is_err());
}

#[test]
fn sanitize_query_rejects_nested_disallowed_operator() {
    let queue_id = QueueId::new();
    let filter = QueryFilter::Native(doc! { "$and": [ { "$expr": { "$eq": ["$a", "$b"] } } ] });
    assert!(sanitize_query(&queue_id, filter).is_err());
}

#[test]
fn sanitize_update_rejects_immutable_fields() {
    assert!(sanitize_update(doc! { "$set": { "queue_id": "q" } }, now(), false).is_err());
    assert!(sanitize_update(doc! { "$set": { "_id": "x" } }, now(), false).is_err());
    assert!(sanitize_update(doc! { "$set": { "created_at": now() } }, now(), false).is_err());
}

#[test]
fn sanitize_update_rejects_privileged_fields_unless_explicitly_allowed() {
    assert!(sanitize_update(doc! { "$set": { "status": "SUCCESS" } }, now(), false).is_err());
    assert!(sanitize_update(doc! { "$set": { "status": "SUCCESS" } }, now(), true).is_ok());
}

#[test]
fn sanitize_update_never_allows_password_even_when_privileged() {
    assert!(sanitize_update(doc! { "$set": { "password": "hunter2" } }, now(), true).is_err());
}

#[test]
fn sanitize_update_always_stamps_last_modified() {
    let n = now();
    let got = sanitize_update(doc! { "$set": { "task_name": "x" } }, n, false).unwrap();
    let set = got.get_document("$set").unwrap();
    assert!(set.contains_key("last_modified"));
    assert_eq!(set.get_str("task_name").unwrap(), "x");
}

#[test]
fn sanitize_update_accepts_bare_document_without_dollar_set() {
    let got = sanitize_update(doc! { "task_name": "renamed" }, now(), false).unwrap();
    let set = got.get_document("$set").unwrap();
    assert_eq!(set.get_str("task_name").unwrap(), "renamed");
}

#[test]
fn add_key_prefix_rewrites_keys() {
    let got = add_key_prefix(doc! { "tag": "x", "owner": "y" }, "metadata.");
    assert_eq!(got, doc! { "metadata.tag": "x", "metadata.owner": "y" });
}

#[test]
fn required_fields_prefilter_prefixes_with_args() {
    let got = required_fields_prefilter(&doc! { "gpu": "a100" });
    assert_eq!(got, doc! { "args.gpu": "a100" });
}

#[test]
fn arg_match_checks_dotted_path_equality() {
    let args = doc! { "nested": { "gpu": "a100" }, "count": 2 };
    assert!(arg_match(&args, &doc! { "nested.gpu": "a100" }));
    assert!(arg_match(&args, &doc! { "count": 2 }));
    assert!(!arg_match(&args, &doc! { "nested.gpu": "v100" }));
    assert!(!arg_match(&args, &doc! { "missing.path": 1 }));
}

#[test]
fn arg_match_empty_required_always_matches() {
    assert!(arg_match(&doc! {}, &doc! {}));
}
