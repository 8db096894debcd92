// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential resolution (spec.md §6 "Authentication"; grounded on the
//! shared-context request-handler shape of `crates/daemon/src/listener/mod.rs`'s
//! `ListenCtx`, adapted here to a stateless resolver rather than a
//! long-lived connection context since this service has no socket session).

use ty_core::{password, Error, QueueId, Result};
use ty_storage::DbService;

/// A verified caller identity: a queue id resolved from a
/// `(queue_name, password)` credential pair.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub queue_id: QueueId,
}

impl AuthContext {
    /// Verify `password` against the stored hash for `queue_name` and
    /// resolve its `queue_id`. `Unauthorized` on any mismatch — a missing
    /// queue and a wrong password are indistinguishable to the caller, since
    /// a missing-queue/bad-password distinction would leak which queue
    /// names exist.
    pub async fn resolve(storage: &DbService, queue_name: &str, supplied_password: &str) -> Result<Self> {
        let queue = storage
            .get_queue(None, Some(queue_name))
            .await?
            .ok_or_else(|| Error::unauthorized("invalid queue credentials"))?;

        let ok = password::verify(supplied_password, &queue.password)?;
        if !ok {
            return Err(Error::unauthorized("invalid queue credentials"));
        }

        Ok(AuthContext { queue_id: queue.id })
    }
}

// `AuthContext::resolve` needs a live `DbService` and so is exercised by the
// `ty-specs` integration tests rather than a unit test here.
