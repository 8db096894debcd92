// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mongodb::bson::doc;

use super::*;

#[test]
fn doc_to_json_renders_plain_strings() {
    let document = doc! { "_id": "que-abc", "queue_name": "demo" };
    let value = doc_to_json(&document);
    assert_eq!(value["_id"], "que-abc");
    assert_eq!(value["queue_name"], "demo");
}

#[test]
fn field_str_falls_back_to_dash() {
    let document = doc! { "task_name": "build" };
    assert_eq!(field_str(&document, "task_name"), "build");
    assert_eq!(field_str(&document, "missing"), "-");
}

#[test]
fn handle_list_prints_empty_message() {
    let result = handle_list(OutputFormat::Text, &[], "No items found", |_| {
        panic!("render_text should not be called for an empty list");
    });
    assert!(result.is_ok());
}

#[test]
fn handle_list_invokes_render_text_when_non_empty() {
    let items = vec![doc! { "_id": "tsk-1" }];
    let mut rendered = false;
    let result = handle_list(OutputFormat::Text, &items, "empty", |docs| {
        rendered = docs.len() == 1;
    });
    assert!(result.is_ok());
    assert!(rendered);
}

#[test]
fn format_or_json_uses_text_fn_for_text_format() {
    let mut called = false;
    let result = format_or_json(OutputFormat::Text, &42, || called = true);
    assert!(result.is_ok());
    assert!(called);
}

#[test]
fn format_or_json_serializes_for_json_format() {
    let result = format_or_json(OutputFormat::Json, &42, || panic!("unreachable"));
    assert!(result.is_ok());
}
