// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the server crate (spec.md
//! §6 "Configuration inputs"; grounded on `crates/daemon/src/env.rs`'s
//! env-first configuration style).

use std::time::Duration;

/// Default sweep interval (30 seconds) when `TY_SWEEP_INTERVAL_SECS` is unset.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;

/// Default database name when `TY_DB_NAME` is unset.
const DEFAULT_DB_NAME: &str = "taskyard";

/// Default store URI when `TY_MONGO_URI` is unset.
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

/// Runtime configuration for a `ty-server` instance. Every field has a
/// typed default so a bare `ServerConfig::from_env()` is enough to boot a
/// local instance against a default `mongod`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub mongo_uri: String,
    pub db_name: String,
    pub sweep_interval: Duration,
    pub log_level: String,
}

impl ServerConfig {
    /// Load from `TY_MONGO_URI`, `TY_DB_NAME`, `TY_SWEEP_INTERVAL_SECS`,
    /// `TY_LOG_LEVEL`, falling back to typed defaults for anything unset or
    /// unparseable.
    pub fn from_env() -> Self {
        ServerConfig {
            mongo_uri: std::env::var("TY_MONGO_URI").unwrap_or_else(|_| DEFAULT_MONGO_URI.to_string()),
            db_name: std::env::var("TY_DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
            sweep_interval: std::env::var("TY_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)),
            log_level: std::env::var("TY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
