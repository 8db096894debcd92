// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn hash_then_verify_succeeds() {
    let hashed = hash("correct horse battery staple").unwrap();
    assert!(verify("correct horse battery staple", &hashed).unwrap());
}

#[test]
fn verify_rejects_wrong_password() {
    let hashed = hash("correct horse battery staple").unwrap();
    assert!(!verify("wrong password", &hashed).unwrap());
}

#[test]
fn hash_is_salted_and_nondeterministic() {
    let a = hash("same-password").unwrap();
    let b = hash("same-password").unwrap();
    assert_ne!(a, b);
    assert!(verify("same-password", &a).unwrap());
    assert!(verify("same-password", &b).unwrap());
}

#[test]
fn verify_rejects_malformed_stored_hash() {
    assert!(verify("anything", "not-a-phc-string").is_err());
}
