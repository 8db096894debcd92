// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The [`Queue`] entity (spec.md §3).

use chrono::{DateTime, Utc};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

use super::QueueId;

/// A named, password-protected namespace owning tasks and workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Queue {
    #[serde(rename = "_id")]
    pub id: QueueId,
    pub queue_name: String,
    /// Opaque argon2 PHC string; never serialized back to a caller (see
    /// `DbService::projection` / `ty-storage::sanitize`).
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Document,
}
