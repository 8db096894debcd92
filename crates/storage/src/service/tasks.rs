// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mongodb::bson::{doc, Bson, Document};
use ty_core::{Error, QueueId, Result, Task, TaskCmd, TaskEvent, TaskFsm, TaskId, TaskState};

use super::DbService;
use crate::sanitize::sanitize_update;
use crate::transaction::TransactionGuard;

/// Default retry budget for a newly created task (spec.md §4.4).
const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default task priority: higher wins (spec.md §3).
const DEFAULT_PRIORITY: i64 = 10;

impl DbService {
    /// `BadRequest` if both `args` and `cmd` are absent/empty. Initial
    /// status PENDING, retries 0.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_task(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        task_name: Option<String>,
        args: Option<Document>,
        metadata: Option<Document>,
        cmd: Option<TaskCmd>,
        heartbeat_timeout: Option<f64>,
        task_timeout: Option<f64>,
        max_retries: Option<u32>,
        priority: Option<i64>,
    ) -> Result<TaskId> {
        let args = args.unwrap_or_default();
        let args_empty = args.is_empty();
        let cmd_empty = cmd.as_ref().map(TaskCmd::is_empty).unwrap_or(true);
        if args_empty && cmd_empty {
            return Err(Error::bad_request("one of args or cmd must be non-empty"));
        }

        let now = self.now();
        let task = Task {
            id: TaskId::new(),
            queue_id: *queue_id,
            status: TaskState::Pending,
            task_name,
            args,
            cmd,
            metadata: metadata.unwrap_or_default(),
            priority: priority.unwrap_or(DEFAULT_PRIORITY),
            retries: 0,
            max_retries: max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            created_at: now,
            start_time: None,
            last_heartbeat: None,
            last_modified: now,
            heartbeat_timeout,
            task_timeout,
            worker_id: None,
            summary: Document::new(),
        };

        self.tasks
            .insert_one(&task)
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(task.id)
    }

    /// Updates `last_heartbeat = now`. Idempotent; never raises if the task
    /// is not currently RUNNING — a heartbeat racing the sweeper simply
    /// mutates a stale record with no functional effect.
    pub async fn refresh_task_heartbeat(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        task_id: &TaskId,
    ) -> Result<bool> {
        let result = self
            .tasks
            .update_one(
                doc! { "_id": task_id.as_str(), "queue_id": queue_id.as_str() },
                doc! { "$set": { "last_heartbeat": self.now() } },
            )
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(result.modified_count > 0)
    }

    /// Sanitizes `task_setting_update`; always sets `last_modified`; if
    /// `reset_pending`, also resets `status=PENDING, retries=0`. Used to
    /// re-queue FAILED or CANCELLED tasks.
    pub async fn update_task(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        task_id: &TaskId,
        task_setting_update: Option<Document>,
        reset_pending: bool,
    ) -> Result<bool> {
        let now = self.now();
        let mut update = sanitize_update(task_setting_update.unwrap_or_default(), now, false)?;
        if reset_pending {
            let set = update.get_document_mut("$set").map_err(|e| Error::internal(e.to_string()))?;
            set.insert("status", TaskState::Pending.to_string());
            set.insert("retries", 0i64);
        }

        let result = self
            .tasks
            .update_one(doc! { "_id": task_id.as_str(), "queue_id": queue_id.as_str() }, update)
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(result.modified_count > 0)
    }

    /// Routed through [`TaskFsm`] for uniformity (spec.md §9 open question
    /// (a)): legal from both PENDING and RUNNING, unlike the source, which
    /// special-cased PENDING outside its state machine. The update is
    /// pinned to the status observed when the FSM was built, so a
    /// concurrent transition (e.g. a racing `fetch_task` or sweeper sweep)
    /// loses the update rather than silently overwriting it.
    pub async fn cancel_task(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        task_id: &TaskId,
    ) -> Result<bool> {
        let task = self
            .tasks
            .find_one(doc! { "_id": task_id.as_str(), "queue_id": queue_id.as_str() })
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?
            .ok_or_else(|| Error::not_found(format!("task not found: {}", task_id.as_str())))?;

        let next = TaskFsm::from_parts(task.status, task.retries, task.max_retries)
            .apply(TaskEvent::Cancel)
            .map_err(|e| Error::bad_request(e.to_string()))?;

        let filter = doc! {
            "_id": task_id.as_str(),
            "status": task.status.to_string(),
        };
        let update = doc! {
            "$set": {
                "status": next.state.to_string(),
                "worker_id": Bson::Null,
                "last_modified": self.now(),
            },
        };
        let result = self
            .tasks
            .update_one(filter, update)
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(result.modified_count > 0)
    }

    pub async fn delete_task(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        task_id: &TaskId,
    ) -> Result<u64> {
        let result = self
            .tasks
            .delete_one(doc! { "_id": task_id.as_str(), "queue_id": queue_id.as_str() })
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(result.deleted_count)
    }
}
