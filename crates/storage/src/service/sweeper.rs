// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson};
use ty_core::{Result, Task, TaskEvent, TaskFsm, TaskId, TaskState};

use super::DbService;

impl DbService {
    /// Timeout sweep (spec.md §4.5): find every RUNNING task whose heartbeat
    /// or total runtime has lapsed, fail it through the FSM (cascading to its
    /// worker), and clear its assignment. No auth — this is a data-layer
    /// maintenance operation driven by the server's background loop, not a
    /// caller-facing RPC. Each task gets its own transaction so one bad
    /// record can't abort the whole sweep; a per-task error is swallowed and
    /// the sweep continues.
    pub async fn handle_timeouts(&self) -> Vec<TaskId> {
        let now = self.now();
        let running: Vec<Task> = match self.tasks.find(doc! { "status": TaskState::Running.to_string() }).await {
            Ok(cursor) => cursor.try_collect().await.unwrap_or_default(),
            Err(_) => return Vec::new(),
        };

        let mut swept = Vec::new();
        for task in running {
            if !self.has_timed_out(&task, now) {
                continue;
            }
            match self.sweep_one(&task).await {
                Ok(true) => swept.push(task.id),
                Ok(false) | Err(_) => {}
            }
        }
        swept
    }

    fn has_timed_out(&self, task: &Task, now: chrono::DateTime<chrono::Utc>) -> bool {
        let heartbeat_expired = match (task.heartbeat_timeout, task.last_heartbeat) {
            (Some(timeout), Some(last)) => (now - last).num_milliseconds() as f64 > timeout * 1000.0,
            _ => false,
        };
        let task_expired = match (task.task_timeout, task.start_time) {
            (Some(timeout), Some(start)) => (now - start).num_milliseconds() as f64 > timeout * 1000.0,
            _ => false,
        };
        heartbeat_expired || task_expired
    }

    /// Applies a `fail` event to `task` inside its own transaction. Returns
    /// `Ok(false)` (no-op) if the task already left RUNNING by the time the
    /// transaction acquired it — a race with a worker's own report.
    async fn sweep_one(&self, task: &Task) -> Result<bool> {
        let mut tx = self.transaction().await?;

        let next = match TaskFsm::from_parts(task.status, task.retries, task.max_retries).apply(TaskEvent::Fail) {
            Ok(next) => next,
            Err(_) => {
                tx.abort().await?;
                return Ok(false);
            }
        };

        if let Some(worker_id) = &task.worker_id {
            self.apply_worker_fail(&mut tx, worker_id).await?;
        }

        let result = self
            .tasks
            .update_one(
                doc! { "_id": task.id.as_str(), "status": TaskState::Running.to_string() },
                doc! { "$set": {
                    "status": next.state.to_string(),
                    "retries": i64::from(next.retries),
                    "worker_id": Bson::Null,
                    "last_modified": self.now(),
                    "summary.labtasker_error": "Either heartbeat or task execution timed out",
                }},
            )
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;

        if result.modified_count == 0 {
            tx.abort().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
