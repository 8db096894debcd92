// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The [`Worker`] entity (spec.md §3).

use chrono::{DateTime, Utc};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

use crate::fsm::WorkerState;

use super::{QueueId, WorkerId};

/// Default retry budget for a newly created worker.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    #[serde(rename = "_id")]
    pub id: WorkerId,
    pub queue_id: QueueId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    pub status: WorkerState,
    pub retries: u32,
    pub max_retries: u32,
    #[serde(default)]
    pub metadata: Document,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}
