// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup (spec.md §6 ambient logging; grounded on
//! `crates/daemon/src/lifecycle/startup.rs`'s subscriber setup, adapted from
//! a file-appender sink to stderr since this service has no daemon state
//! directory of its own).

use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber once per process. `log_level`
/// is used as the default filter directive when `RUST_LOG` is unset.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}
