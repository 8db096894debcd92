// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn bad_request_carries_detail() {
    let err = Error::bad_request("queue name is required");
    assert_eq!(err.to_string(), "bad request: queue name is required");
}

#[test]
fn constructors_map_to_expected_variants() {
    assert!(matches!(Error::not_found("x"), Error::NotFound(_)));
    assert!(matches!(Error::conflict("x"), Error::Conflict(_)));
    assert!(matches!(Error::forbidden("x"), Error::Forbidden(_)));
    assert!(matches!(Error::unauthorized("x"), Error::Unauthorized(_)));
    assert!(matches!(Error::internal("x"), Error::Internal(_)));
}
