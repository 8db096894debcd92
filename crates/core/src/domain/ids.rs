// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity identifiers, built on [`crate::define_id!`].

crate::define_id! {
    /// Unique identifier for a queue.
    pub struct QueueId("que-");
}

crate::define_id! {
    /// Unique identifier for a task.
    pub struct TaskId("tsk-");
}

crate::define_id! {
    /// Unique identifier for a worker.
    pub struct WorkerId("wkr-");
}
