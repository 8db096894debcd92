// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ty-storage: the transactional document-store core of the task-queue
//! coordination engine.
//!
//! Everything here does I/O against MongoDB. The pure decision logic (the two
//! FSMs, the error taxonomy, the domain shapes) lives in `ty-core`; this
//! crate is where that logic meets a real store: CRUD for queues/tasks/
//! workers, the query sanitizer, the atomic fetch-task selector, and the
//! timeout sweeper.

mod error_map;
pub mod sanitize;
pub mod service;
pub mod transaction;

pub use service::{CollectionName, DbService, FetchTaskArgs, ReportStatus};
pub use transaction::TransactionGuard;
