// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mongodb::bson::{doc, Bson, Document};
use ty_core::{Error, QueueId, Result, Worker, WorkerEvent, WorkerFsm, WorkerId, WorkerState};

use super::DbService;
use crate::transaction::TransactionGuard;

/// Default retry budget for a newly created worker (spec.md §4.4).
const DEFAULT_MAX_RETRIES: u32 = 3;

impl DbService {
    /// Initial status ACTIVE, retries 0.
    pub async fn create_worker(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        worker_name: Option<String>,
        metadata: Option<Document>,
        max_retries: Option<u32>,
    ) -> Result<WorkerId> {
        let now = self.now();
        let worker = Worker {
            id: WorkerId::new(),
            queue_id: *queue_id,
            worker_name,
            status: WorkerState::Active,
            retries: 0,
            max_retries: max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            metadata: metadata.unwrap_or_default(),
            created_at: now,
            last_modified: now,
        };
        self.workers
            .insert_one(&worker)
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(worker.id)
    }

    /// If cascading, every task with that `worker_id` has its `worker_id`
    /// cleared and `last_modified` bumped; task status is never changed.
    pub async fn delete_worker(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        worker_id: &WorkerId,
        cascade_update: bool,
    ) -> Result<u64> {
        if cascade_update {
            self.tasks
                .update_many(
                    doc! { "queue_id": queue_id.as_str(), "worker_id": worker_id.as_str() },
                    doc! { "$set": { "worker_id": Bson::Null, "last_modified": self.now() } },
                )
                .session(tx.session_mut())
                .await
                .map_err(crate::error_map::map_mongo_error)?;
        }

        let result = self
            .workers
            .delete_one(doc! { "_id": worker_id.as_str(), "queue_id": queue_id.as_str() })
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(result.deleted_count)
    }

    /// Apply `WorkerFsm` for `activate`/`suspend`/`fail`.
    pub async fn report_worker_status(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        worker_id: &WorkerId,
        report_status: WorkerEvent,
    ) -> Result<bool> {
        let worker = self
            .workers
            .find_one(doc! { "_id": worker_id.as_str(), "queue_id": queue_id.as_str() })
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?
            .ok_or_else(|| Error::not_found(format!("worker not found: {}", worker_id.as_str())))?;

        let next = WorkerFsm::from_parts(worker.status, worker.retries, worker.max_retries)
            .apply(report_status)
            .map_err(|e| Error::bad_request(e.to_string()))?;

        let result = self
            .workers
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
        Ok(result.modified_count > 0)
    }
}
