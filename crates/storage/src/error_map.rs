// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps driver errors onto the service error taxonomy (spec.md §7).

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use ty_core::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Store `DuplicateKey` becomes `Conflict`; anything else inside a
/// transaction causes abort + `Internal` (already-typed `ty_core::Error`s
/// are never routed through here — they are re-raised unchanged by callers).
pub fn map_mongo_error(err: MongoError) -> Error {
    if is_duplicate_key(&err) {
        return Error::conflict(err.to_string());
    }
    Error::internal(err.to_string())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE
    )
}
