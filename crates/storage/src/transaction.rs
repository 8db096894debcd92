// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The explicit transaction-guard parameter.
//!
//! The original implementation tracks "am I inside a transaction?" with a
//! thread-local dynamic variable. Rust has no safe ambient-scoping
//! equivalent across `.await` points, so the same discipline is expressed
//! here as an explicit, RAII-acquired parameter threaded through every
//! mutating call (spec.md §5, §9) — the same release-on-drop shape as the
//! `parking_lot::Mutex` guards used throughout the daemon's storage layer.
//! There is deliberately no shared nesting-detection flag on `DbService`:
//! a call that needs to extend an already-open transaction takes `&mut
//! TransactionGuard` as a parameter (see `apply_worker_fail`/`apply_report`
//! in `crate::service::report`) rather than asking `DbService` for a new
//! one, so re-entry is a borrow-checked impossibility rather than something
//! that needs a runtime flag to catch, and two unrelated concurrent
//! transactions never contend with each other.

use mongodb::ClientSession;
use ty_core::{Error, Result};

/// A handle over one active Mongo transaction/session.
///
/// `DbService` methods that mutate state take `&mut TransactionGuard`
/// rather than an ambient flag. Dropping the guard without `commit`/`abort`
/// leaves the transaction uncommitted; the driver aborts it when the
/// session is dropped.
pub struct TransactionGuard {
    session: ClientSession,
    resolved: bool,
}

impl TransactionGuard {
    pub(crate) fn new(session: ClientSession) -> Self {
        TransactionGuard { session, resolved: false }
    }

    /// The underlying session, for passing to driver calls via `.session(..)`.
    pub fn session_mut(&mut self) -> &mut ClientSession {
        &mut self.session
    }

    /// Commit the transaction, consuming the guard.
    pub async fn commit(mut self) -> Result<()> {
        self.session
            .commit_transaction()
            .await
            .map_err(|e| Error::internal(format!("transaction commit failed: {e}")))?;
        self.resolved = true;
        Ok(())
    }

    /// Explicitly abort the transaction, consuming the guard.
    pub async fn abort(mut self) -> Result<()> {
        self.session
            .abort_transaction()
            .await
            .map_err(|e| Error::internal(format!("transaction abort failed: {e}")))?;
        self.resolved = true;
        Ok(())
    }
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        if !self.resolved {
            tracing::warn!("transaction guard dropped without an explicit commit or abort");
        }
    }
}

// `TransactionGuard` wraps a live `mongodb::ClientSession` and cannot be
// constructed without a running store, so its lifecycle is exercised by the
// `ty-specs` integration tests rather than a unit test here.
