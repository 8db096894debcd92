// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The transactional core: CRUD for queues/tasks/workers, the fetch-task
//! selector, heartbeat and status reports, cascading deletes, and the
//! timeout sweeper (spec.md §4.4, §4.5).

mod collection;
mod fetch;
mod queues;
mod report;
mod sweeper;
mod tasks;
mod workers;

pub use collection::CollectionName;
pub use fetch::FetchTaskArgs;
pub use report::ReportStatus;

use std::sync::Arc;

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, ClientSession, Collection, Database, IndexModel};
use ty_core::{Clock, Error, Queue, Result, SystemClock, Task, Worker};

use crate::transaction::TransactionGuard;

/// One instance per process. Owns the Mongo connection pool and the
/// collections backing the three entities.
pub struct DbService {
    client: Client,
    queues: Collection<Queue>,
    tasks: Collection<Task>,
    workers: Collection<Worker>,
    clock: Arc<dyn Clock>,
}

impl DbService {
    /// Connect using the real wall clock.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        Self::connect_with_clock(uri, db_name, Arc::new(SystemClock::default())).await
    }

    /// Connect with an injected [`Clock`] (used by tests to control time for
    /// heartbeat/timeout scenarios).
    pub async fn connect_with_clock(uri: &str, db_name: &str, clock: Arc<dyn Clock>) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| Error::internal(format!("failed to connect to store: {e}")))?;
        let db: Database = client.database(db_name);

        let service = DbService {
            client,
            queues: db.collection("queues"),
            tasks: db.collection("tasks"),
            workers: db.collection("workers"),
            clock,
        };
        service.ensure_indexes().await?;
        Ok(service)
    }

    /// Indexes the store must maintain (spec.md §3), created once at connect
    /// time — mirrors the original's `_setup_collections` call.
    async fn ensure_indexes(&self) -> Result<()> {
        let unique = IndexOptions::builder().unique(true).build();
        self.queues
            .create_index(IndexModel::builder().keys(doc! { "queue_name": 1 }).options(unique).build())
            .await
            .map_err(crate::error_map::map_mongo_error)?;

        for keys in [
            doc! { "queue_id": 1 },
            doc! { "status": 1 },
            doc! { "priority": -1 },
            doc! { "created_at": 1 },
        ] {
            self.tasks
                .create_index(IndexModel::builder().keys(keys).build())
                .await
                .map_err(crate::error_map::map_mongo_error)?;
        }

        for keys in [doc! { "queue_id": 1 }, doc! { "worker_name": 1 }] {
            self.workers
                .create_index(IndexModel::builder().keys(keys).build())
                .await
                .map_err(crate::error_map::map_mongo_error)?;
        }

        Ok(())
    }

    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Acquire a new transaction (spec.md §5, §9). There is nothing here to
    /// reject "nesting" against: a call that wants to extend an already-open
    /// transaction is given `&mut TransactionGuard` directly by its caller
    /// (see `service::report::apply_worker_fail`) rather than asking
    /// `DbService` for one — the explicit-parameter discipline spec.md §9
    /// asks for *is* the reuse mechanism, so every call to this method
    /// starts a genuinely fresh, independent transaction.
    pub async fn transaction(&self) -> Result<TransactionGuard> {
        let mut session: ClientSession = self
            .client
            .start_session()
            .await
            .map_err(|e| Error::internal(format!("failed to start session: {e}")))?;
        session
            .start_transaction()
            .await
            .map_err(|e| Error::internal(format!("failed to start transaction: {e}")))?;

        Ok(TransactionGuard::new(session))
    }

    /// Release the connection pool. The driver has no explicit close; this
    /// exists as a named lifecycle method mirroring the daemon's own
    /// `close()` surface.
    pub fn close(self) {
        drop(self.client);
    }
}
