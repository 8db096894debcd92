// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mongodb::bson::{doc, Bson, Document};
use ty_core::{Error, QueueId, Result, Task, TaskEvent, TaskFsm, TaskId, WorkerEvent, WorkerFsm, WorkerId};

use super::DbService;
use crate::sanitize::add_key_prefix;
use crate::transaction::TransactionGuard;

/// The outcome a worker or administrator reports for a task (spec.md §4.4).
/// Mirrors the three report-able `TaskEvent`s; `cancel` is also reachable
/// via this path since a worker may self-report cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Success,
    Failed,
    Cancelled,
}

impl ReportStatus {
    fn to_event(self) -> TaskEvent {
        match self {
            ReportStatus::Success => TaskEvent::Complete,
            ReportStatus::Failed => TaskEvent::Fail,
            ReportStatus::Cancelled => TaskEvent::Cancel,
        }
    }
}

impl DbService {
    /// `NotFound` if the task is missing; `Conflict` if the task's
    /// `worker_id` does not match `worker_id` (a late report from a
    /// reassigned task, S6).
    pub async fn worker_report_task_status(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        task_id: &TaskId,
        worker_id: &WorkerId,
        report_status: ReportStatus,
        summary_update: Option<Document>,
    ) -> Result<bool> {
        let task = self.load_task(tx, queue_id, task_id).await?;
        match &task.worker_id {
            Some(owner) if owner == worker_id => {}
            _ => {
                return Err(Error::conflict(format!(
                    "task {} is not owned by worker {}",
                    task_id.as_str(),
                    worker_id.as_str()
                )))
            }
        }
        self.apply_report(tx, task, report_status, summary_update).await
    }

    /// Same as [`Self::worker_report_task_status`] without the ownership
    /// check — the privileged/administrative path.
    pub async fn report_task_status(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        task_id: &TaskId,
        report_status: ReportStatus,
        summary_update: Option<Document>,
    ) -> Result<bool> {
        let task = self.load_task(tx, queue_id, task_id).await?;
        self.apply_report(tx, task, report_status, summary_update).await
    }

    async fn load_task(&self, tx: &mut TransactionGuard, queue_id: &QueueId, task_id: &TaskId) -> Result<Task> {
        self.tasks
            .find_one(doc! { "_id": task_id.as_str(), "queue_id": queue_id.as_str() })
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?
            .ok_or_else(|| Error::not_found(format!("task not found: {}", task_id.as_str())))
    }

    /// Shared report path (spec.md §4.4): apply the TaskFsm event, cascade a
    /// `fail` event to the owning worker on a failure report, merge
    /// `summary_update` at `summary.<key>`, and persist the result with
    /// `worker_id` cleared.
    async fn apply_report(
        &self,
        tx: &mut TransactionGuard,
        task: Task,
        report_status: ReportStatus,
        summary_update: Option<Document>,
    ) -> Result<bool> {
        let event = report_status.to_event();
        let next = TaskFsm::from_parts(task.status, task.retries, task.max_retries)
            .apply(event)
            .map_err(|e| Error::bad_request(e.to_string()))?;

        if matches!(report_status, ReportStatus::Failed) {
            if let Some(worker_id) = &task.worker_id {
                self.apply_worker_fail(tx, worker_id).await?;
            }
        }

        let mut set_doc = doc! {
            "status": next.state.to_string(),
            "retries": i64::from(next.retries),
            "last_modified": self.now(),
            "worker_id": Bson::Null,
        };
        if let Some(summary) = summary_update {
            set_doc.extend(add_key_prefix(summary, "summary."));
        }

        let result = self
            .tasks
            .update_one(doc! { "_id": task.id.as_str() }, doc! { "$set": set_doc })
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(result.modified_count > 0)
    }

    /// Apply a `WorkerFsm::Fail` event to `worker_id`, ignoring a missing
    /// worker (the task's `worker_id` may reference a worker deleted without
    /// cascade).
    pub(super) async fn apply_worker_fail(&self, tx: &mut TransactionGuard, worker_id: &WorkerId) -> Result<()> {
        let worker = match self
            .workers
            .find_one(doc! { "_id": worker_id.as_str() })
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?
        {
            Some(w) => w,
            None => return Ok(()),
        };

        let next = WorkerFsm::from_parts(worker.status, worker.retries, worker.max_retries)
            .apply(WorkerEvent::Fail)
            .map_err(|e| Error::bad_request(e.to_string()))?;

        self.workers
            .update_one(
                doc! { "_id": worker_id.as_str() },
                doc! { "$set": {
                    "status": next.state.to_string(),
                    "retries": i64::from(next.retries),
                    "last_modified": self.now(),
                }},
            )
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(())
    }
}
