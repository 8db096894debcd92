// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ReturnDocument;
use ty_core::{Error, QueueId, Result, Task, TaskState, WorkerId, WorkerState};

use super::DbService;
use crate::sanitize::{arg_match, required_fields_prefilter, sanitize_query, QueryFilter};
use crate::transaction::TransactionGuard;

/// Arguments to [`DbService::fetch_task`] (spec.md §4.4).
#[derive(Debug, Clone)]
pub struct FetchTaskArgs {
    pub worker_id: Option<WorkerId>,
    /// Maximum seconds a fetched task may run before it is considered
    /// timed out, required when `start_heartbeat` is false.
    pub eta_max: Option<f64>,
    pub heartbeat_timeout: Option<f64>,
    pub start_heartbeat: bool,
    pub required_fields: Option<Document>,
    pub extra_filter: Option<QueryFilter>,
}

impl Default for FetchTaskArgs {
    fn default() -> Self {
        FetchTaskArgs {
            worker_id: None,
            eta_max: None,
            heartbeat_timeout: None,
            start_heartbeat: true,
            required_fields: None,
            extra_filter: None,
        }
    }
}

impl DbService {
    /// The atomic "fetch next task" scheduler (spec.md §4.4, 8 steps). Builds
    /// a priority-ordered candidate filter, then attempts a conditional
    /// `find_one_and_update` pinned to `{_id, status: PENDING}` per
    /// candidate until one applies or the cursor is exhausted — the
    /// at-most-one-winner guarantee underneath concurrent `fetch_task` races
    /// (P4, S3).
    pub async fn fetch_task(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        args: FetchTaskArgs,
    ) -> Result<Option<Task>> {
        if let Some(ref worker_id) = args.worker_id {
            let worker = self
                .workers
                .find_one(doc! { "_id": worker_id.as_str(), "queue_id": queue_id.as_str() })
                .session(tx.session_mut())
                .await
                .map_err(crate::error_map::map_mongo_error)?
                .ok_or_else(|| Error::not_found(format!("worker not found: {}", worker_id.as_str())))?;
            if worker.status != WorkerState::Active {
                return Err(Error::forbidden("worker is not ACTIVE"));
            }
        }

        if !args.start_heartbeat && args.eta_max.is_none() {
            return Err(Error::bad_request("eta_max is required when start_heartbeat is false"));
        }

        let mut filter = doc! {
            "queue_id": queue_id.as_str(),
            "status": TaskState::Pending.to_string(),
        };
        if let Some(required) = &args.required_fields {
            filter.extend(required_fields_prefilter(required));
        }
        if let Some(extra) = args.extra_filter.clone() {
            let scoped = sanitize_query(queue_id, extra)?;
            filter = doc! { "$and": [filter, scoped] };
        }

        let sort = doc! { "priority": -1, "last_modified": 1, "created_at": 1 };
        let mut cursor = self
            .tasks
            .find(filter)
            .sort(sort)
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;

        let now = self.now();
        let worker_id_str = args.worker_id.as_ref().map(|w| w.as_str().to_string());
        let last_heartbeat = if args.start_heartbeat { Bson::from(now) } else { Bson::Null };

        loop {
            let candidate = match cursor.next(tx.session_mut()).await {
                Some(Ok(task)) => task,
                Some(Err(e)) => return Err(crate::error_map::map_mongo_error(e)),
                None => return Ok(None),
            };

            if let Some(required) = &args.required_fields {
                if !arg_match(&candidate.args, required) {
                    continue;
                }
            }

            let mut set_doc = doc! {
                "status": TaskState::Running.to_string(),
                "start_time": now,
                "last_heartbeat": last_heartbeat.clone(),
                "worker_id": worker_id_str.clone(),
                "last_modified": now,
            };
            if let Some(hb) = args.heartbeat_timeout {
                set_doc.insert("heartbeat_timeout", hb);
            }
            if let Some(tt) = args.eta_max {
                set_doc.insert("task_timeout", tt);
            }

            let updated = self
                .tasks
                .find_one_and_update(
                    doc! { "_id": candidate.id.as_str(), "status": TaskState::Pending.to_string() },
                    doc! { "$set": set_doc },
                )
                .return_document(ReturnDocument::After)
                .session(tx.session_mut())
                .await
                .map_err(crate::error_map::map_mongo_error)?;

            if let Some(task) = updated {
                return Ok(Some(task));
            }
            // Another caller won the race on this candidate; try the next one.
        }
    }
}
