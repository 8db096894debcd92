// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The periodic timeout sweeper (spec.md §4.5, §2 component 7).
//!
//! `DbService::handle_timeouts` is the pure-ish data-layer sweep; this module
//! is just the interval loop that drives it and the graceful-shutdown
//! plumbing, grounded on the teacher's `crates/daemon/src/engine/monitor.rs`
//! interval-task shape (a `tokio::time::interval` loop selecting against a
//! `CancellationToken`).

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use ty_storage::DbService;

/// Run the sweeper loop until `shutdown` is cancelled.
///
/// Each tick calls `DbService::handle_timeouts` and logs the ids of any
/// tasks it transitioned. A slow or failing sweep never blocks the next
/// tick indefinitely — `interval` ticks are independent of how long the
/// previous sweep took (a `MissedTickBehavior::Delay` interval, matching the
/// teacher's monitor loop).
pub async fn run(storage: &DbService, interval: Duration, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let swept = storage.handle_timeouts().await;
                if !swept.is_empty() {
                    tracing::warn!(count = swept.len(), ids = ?swept, "sweeper transitioned timed-out tasks");
                }
            }
            _ = shutdown.cancelled() => {
                tracing::info!("sweeper loop shutting down");
                break;
            }
        }
    }
}

// `run` drives a live `DbService` in a loop and so is exercised by the
// `ty-specs` integration tests rather than a unit test here.
