// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The [`Task`] entity (spec.md §3).

use chrono::{DateTime, Utc};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

use crate::fsm::TaskState;

use super::{QueueId, TaskId, WorkerId};

/// `cmd` accepts either a bare string or a sequence of strings (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TaskCmd {
    Single(String),
    Args(Vec<String>),
}

impl TaskCmd {
    pub fn is_empty(&self) -> bool {
        match self {
            TaskCmd::Single(s) => s.is_empty(),
            TaskCmd::Args(v) => v.is_empty(),
        }
    }
}

/// Default task priority: higher wins, lower is scheduled later.
pub const DEFAULT_PRIORITY: i64 = 10;

/// Default retry budget for a newly created task.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub queue_id: QueueId,
    pub status: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default)]
    pub args: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<TaskCmd>,
    #[serde(default)]
    pub metadata: Document,
    pub priority: i64,
    pub retries: u32,
    pub max_retries: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_timeout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_timeout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,
    #[serde(default)]
    pub summary: Document,
}

impl Task {
    /// P1: `retries <= max_retries` must hold whenever in PENDING or FAILED.
    /// P2/P3: `worker_id`/`start_time` are coupled to RUNNING.
    #[cfg(test)]
    pub fn check_invariants(&self) {
        if matches!(self.status, TaskState::Pending | TaskState::Failed) {
            assert!(self.retries <= self.max_retries);
        }
        if matches!(self.status, TaskState::Running) {
            assert!(self.worker_id.is_some());
            assert!(self.start_time.is_some());
        } else {
            assert!(self.worker_id.is_none());
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
