// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ty-serverd`: boots the store connection and runs the timeout sweeper on
//! a fixed interval (spec.md §2 component 7, §4.5).
//!
//! The transport that exposes [`ty_server::Service`] to callers (HTTP, or
//! the `ty-cli` binary embedding it directly) is out of scope per spec.md
//! §1; this binary's only job is the background maintenance loop, the way
//! the teacher's `oj-daemon` binary runs its engine loop independent of any
//! particular frontend.

use ty_server::ServerConfig;
use ty_storage::DbService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    ty_server::logging::init_tracing(&config.log_level);

    tracing::info!(
        db_name = %config.db_name,
        sweep_interval = ?config.sweep_interval,
        "starting ty-serverd",
    );

    let storage = DbService::connect(&config.mongo_uri, &config.db_name).await?;
    let shutdown = tokio_util::sync::CancellationToken::new();

    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received shutdown signal");
            ctrl_c_shutdown.cancel();
        }
    });

    ty_server::sweeper::run(&storage, config.sweep_interval, shutdown).await;
    storage.close();
    Ok(())
}
