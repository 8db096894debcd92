// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage-agnostic domain entities (spec.md §3).
//!
//! These types describe the shape of a queue, task, or worker document; they
//! carry no store-specific machinery. `ty-storage` maps them onto
//! `mongodb::bson::Document` at the persistence boundary.

mod ids;
mod queue;
mod task;
mod worker;

pub use ids::{QueueId, TaskId, WorkerId};
pub use queue::Queue;
pub use task::{Task, TaskCmd};
pub use worker::Worker;
