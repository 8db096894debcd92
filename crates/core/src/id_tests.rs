// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

// --- define_id! macro tests ---

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn define_id_generates_unique_prefixed_ids() {
    let a = TestId::new();
    let b = TestId::new();
    assert_ne!(a, b);
    assert!(a.as_str().starts_with("tst-"));
}

#[test]
fn define_id_hash_map_lookup() {
    let id = TestId::from_string("tst-abc");
    let mut map = HashMap::new();
    map.insert(id, 42);
    assert_eq!(map.get("tst-abc"), Some(&42));
}

#[test]
fn define_id_suffix_strips_prefix() {
    let id = TestId::from_string("tst-abcdef");
    assert_eq!(id.suffix(), "abcdef");
}

// --- short() tests ---

#[test]
fn define_id_short_truncates() {
    let id = TestId::from_string("tst-abcdefghijklmnop");
    assert_eq!(id.short(8), "abcdefgh");
}

#[test]
fn define_id_short_returns_full_when_shorter() {
    let id = TestId::from_string("tst-abc");
    assert_eq!(id.short(8), "abc");
}

#[test]
fn define_id_short_returns_full_when_exact() {
    let id = TestId::from_string("tst-abcdefgh");
    assert_eq!(id.short(8), "abcdefgh");
}

#[test]
fn define_id_roundtrips_through_serde() {
    let id = TestId::from_string("tst-abc123");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"tst-abc123\"");
    let back: TestId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn short_fn_on_str() {
    let s = "abcdefghijklmnop";
    assert_eq!(short(s, 8), "abcdefgh");
    assert_eq!(short(s, 100), s);
    assert_eq!(short("abc", 8), "abc");
}
