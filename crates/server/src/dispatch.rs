// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single auth/validation dispatch layer (spec.md §4.6, §9 "Decorator
//! stack"). Grounded on the `ListenCtx`-style shared-context request
//! handlers of `crates/daemon/src/listener/mod.rs` and the per-operation
//! match arms of `crates/daemon/src/listener/mutations/jobs.rs`: rather than
//! re-deriving a decorator macro per operation (the original's Python
//! `@auth_required`/`@validate_arg`/`@risky` stack), every mutating
//! operation here is a `Service` method that resolves credentials once via
//! [`AuthContext::resolve`], opens one transaction, and calls the
//! corresponding `DbService` method.

use mongodb::bson::Document;
use ty_core::{Error, QueueId, Result, TaskCmd, TaskId, WorkerEvent, WorkerId};
use ty_storage::{CollectionName, DbService, FetchTaskArgs, ReportStatus};

use crate::auth::AuthContext;

/// The one entry point external transports (HTTP, CLI) call into.
pub struct Service {
    storage: DbService,
}

impl Service {
    pub fn new(storage: DbService) -> Self {
        Service { storage }
    }

    pub fn storage(&self) -> &DbService {
        &self.storage
    }

    pub async fn close(self) {
        self.storage.close();
    }

    /// No credential required — this is how a caller obtains one.
    #[tracing::instrument(skip(self, password, metadata))]
    pub async fn create_queue(&self, name: &str, password: &str, metadata: Option<Document>) -> Result<QueueId> {
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.create_queue(&mut tx, name, password, metadata).await;
        finish(tx, result).await
    }

    /// Pure read, no credential (needed by the credential resolver itself,
    /// which reaches the password hash through `DbService::get_queue`
    /// directly rather than through this method). The password hash is
    /// stripped before the document leaves this boundary, same as every
    /// other queue-reading path.
    pub async fn get_queue(&self, queue_id: Option<&QueueId>, queue_name: Option<&str>) -> Result<Option<Document>> {
        let queue = self.storage.get_queue(queue_id, queue_name).await?;
        Ok(queue.map(|q| {
            let mut doc = mongodb::bson::to_document(&q).unwrap_or_else(|_| {
                let mut doc = Document::new();
                doc.insert("_id", q.id.as_str());
                doc
            });
            doc.remove("password");
            doc
        }))
    }

    #[tracing::instrument(skip(self, password, new_password, metadata_update))]
    pub async fn update_queue(
        &self,
        queue_name: &str,
        password: &str,
        new_name: Option<String>,
        new_password: Option<String>,
        metadata_update: Option<Document>,
    ) -> Result<u64> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result =
            self.storage.update_queue(&mut tx, &auth.queue_id, new_name, new_password, metadata_update).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn delete_queue(&self, queue_name: &str, password: &str, cascade_delete: bool) -> Result<u64> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.delete_queue(&mut tx, &auth.queue_id, cascade_delete).await;
        finish(tx, result).await
    }

    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip(self, password, args, metadata, cmd))]
    pub async fn create_task(
        &self,
        queue_name: &str,
        password: &str,
        task_name: Option<String>,
        args: Option<Document>,
        metadata: Option<Document>,
        cmd: Option<TaskCmd>,
        heartbeat_timeout: Option<f64>,
        task_timeout: Option<f64>,
        max_retries: Option<u32>,
        priority: Option<i64>,
    ) -> Result<TaskId> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result = self
            .storage
            .create_task(
                &mut tx,
                &auth.queue_id,
                task_name,
                args,
                metadata,
                cmd,
                heartbeat_timeout,
                task_timeout,
                max_retries,
                priority,
            )
            .await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self, password, metadata))]
    pub async fn create_worker(
        &self,
        queue_name: &str,
        password: &str,
        worker_name: Option<String>,
        metadata: Option<Document>,
        max_retries: Option<u32>,
    ) -> Result<WorkerId> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.create_worker(&mut tx, &auth.queue_id, worker_name, metadata, max_retries).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self, password, args))]
    pub async fn fetch_task(
        &self,
        queue_name: &str,
        password: &str,
        args: FetchTaskArgs,
    ) -> Result<Option<Document>> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.fetch_task(&mut tx, &auth.queue_id, args).await;
        let task = finish(tx, result).await?;
        Ok(task.map(|t| mongodb::bson::to_document(&t).unwrap_or_default()))
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn refresh_task_heartbeat(&self, queue_name: &str, password: &str, task_id: &TaskId) -> Result<bool> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.refresh_task_heartbeat(&mut tx, &auth.queue_id, task_id).await;
        finish(tx, result).await
    }

    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip(self, password, summary_update))]
    pub async fn worker_report_task_status(
        &self,
        queue_name: &str,
        password: &str,
        task_id: &TaskId,
        worker_id: &WorkerId,
        report_status: &str,
        summary_update: Option<Document>,
    ) -> Result<bool> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let status = parse_report_status(report_status)?;
        let mut tx = self.storage.transaction().await?;
        let result = self
            .storage
            .worker_report_task_status(&mut tx, &auth.queue_id, task_id, worker_id, status, summary_update)
            .await;
        finish(tx, result).await
    }

    /// Privileged/administrative path: same as
    /// [`Self::worker_report_task_status`] without the worker-ownership
    /// check.
    #[tracing::instrument(skip(self, password, summary_update))]
    pub async fn report_task_status(
        &self,
        queue_name: &str,
        password: &str,
        task_id: &TaskId,
        report_status: &str,
        summary_update: Option<Document>,
    ) -> Result<bool> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let status = parse_report_status(report_status)?;
        let mut tx = self.storage.transaction().await?;
        let result =
            self.storage.report_task_status(&mut tx, &auth.queue_id, task_id, status, summary_update).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self, password, task_setting_update))]
    pub async fn update_task(
        &self,
        queue_name: &str,
        password: &str,
        task_id: &TaskId,
        task_setting_update: Option<Document>,
        reset_pending: bool,
    ) -> Result<bool> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result =
            self.storage.update_task(&mut tx, &auth.queue_id, task_id, task_setting_update, reset_pending).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn cancel_task(&self, queue_name: &str, password: &str, task_id: &TaskId) -> Result<bool> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.cancel_task(&mut tx, &auth.queue_id, task_id).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn delete_task(&self, queue_name: &str, password: &str, task_id: &TaskId) -> Result<u64> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.delete_task(&mut tx, &auth.queue_id, task_id).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn delete_worker(
        &self,
        queue_name: &str,
        password: &str,
        worker_id: &WorkerId,
        cascade_update: bool,
    ) -> Result<u64> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.delete_worker(&mut tx, &auth.queue_id, worker_id, cascade_update).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn report_worker_status(
        &self,
        queue_name: &str,
        password: &str,
        worker_id: &WorkerId,
        report_status: &str,
    ) -> Result<bool> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let event = parse_worker_event(report_status)?;
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.report_worker_status(&mut tx, &auth.queue_id, worker_id, event).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self, password, query))]
    pub async fn query_collection(
        &self,
        queue_name: &str,
        password: &str,
        collection: CollectionName,
        query: ty_storage::sanitize::QueryFilter,
        limit: i64,
        offset: u64,
    ) -> Result<Vec<Document>> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.query_collection(&mut tx, &auth.queue_id, collection, query, limit, offset).await;
        finish(tx, result).await
    }

    /// Marked risky in the source: a caller-supplied update applied
    /// directly, after sanitization, to an arbitrary matching set of
    /// documents.
    #[tracing::instrument(skip(self, password, query, update))]
    pub async fn update_collection(
        &self,
        queue_name: &str,
        password: &str,
        collection: CollectionName,
        query: ty_storage::sanitize::QueryFilter,
        update: Document,
    ) -> Result<u64> {
        let auth = AuthContext::resolve(&self.storage, queue_name, password).await?;
        tracing::warn!(queue_id = %auth.queue_id, ?collection, "risky operation: update_collection");
        let mut tx = self.storage.transaction().await?;
        let result = self.storage.update_collection(&mut tx, &auth.queue_id, collection, query, update).await;
        finish(tx, result).await
    }
}

/// Commit on success, abort on error, and pass the original result through
/// unchanged — the store-layer error taxonomy is already final by the time
/// it reaches here (spec.md §7: "already-typed errors... re-raised
/// unchanged").
async fn finish<T>(tx: ty_storage::TransactionGuard, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            let _ = tx.abort().await;
            Err(e)
        }
    }
}

fn parse_report_status(raw: &str) -> Result<ReportStatus> {
    match raw {
        "success" => Ok(ReportStatus::Success),
        "failed" => Ok(ReportStatus::Failed),
        "cancelled" => Ok(ReportStatus::Cancelled),
        other => Err(Error::bad_request(format!("unsupported report_status: {other}"))),
    }
}

fn parse_worker_event(raw: &str) -> Result<WorkerEvent> {
    match raw {
        "activate" => Ok(WorkerEvent::Activate),
        "suspend" => Ok(WorkerEvent::Suspend),
        "failed" => Ok(WorkerEvent::Fail),
        other => Err(Error::bad_request(format!("unsupported report_status: {other}"))),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
