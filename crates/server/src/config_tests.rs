// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use serial_test::serial;

use super::*;

fn clear_env() {
    for key in ["TY_MONGO_URI", "TY_DB_NAME", "TY_SWEEP_INTERVAL_SECS", "TY_LOG_LEVEL"] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn defaults_when_unset() {
    clear_env();
    let config = ServerConfig::from_env();
    assert_eq!(config.mongo_uri, DEFAULT_MONGO_URI);
    assert_eq!(config.db_name, DEFAULT_DB_NAME);
    assert_eq!(config.sweep_interval, Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS));
    assert_eq!(config.log_level, "info");
}

#[test]
#[serial]
fn reads_overrides() {
    clear_env();
    std::env::set_var("TY_MONGO_URI", "mongodb://example:27017");
    std::env::set_var("TY_DB_NAME", "example_db");
    std::env::set_var("TY_SWEEP_INTERVAL_SECS", "5");
    std::env::set_var("TY_LOG_LEVEL", "debug");

    let config = ServerConfig::from_env();
    assert_eq!(config.mongo_uri, "mongodb://example:27017");
    assert_eq!(config.db_name, "example_db");
    assert_eq!(config.sweep_interval, Duration::from_secs(5));
    assert_eq!(config.log_level, "debug");

    clear_env();
}

#[test]
#[serial]
fn ignores_unparseable_interval() {
    clear_env();
    std::env::set_var("TY_SWEEP_INTERVAL_SECS", "not-a-number");
    let config = ServerConfig::from_env();
    assert_eq!(config.sweep_interval, Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS));
    clear_env();
}
