// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mongodb::bson::{doc, Document};
use ty_core::{QueueId, Result};

use super::DbService;
use crate::sanitize::{sanitize_query, sanitize_update, QueryFilter};
use crate::transaction::TransactionGuard;

/// Entity a generic collection query/update targets (spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionName {
    Queues,
    Tasks,
    Workers,
}

impl CollectionName {
    fn sort(self) -> Document {
        match self {
            CollectionName::Queues => doc! { "created_at": 1 },
            CollectionName::Tasks => doc! { "priority": -1, "created_at": 1 },
            CollectionName::Workers => doc! { "created_at": 1 },
        }
    }
}

impl DbService {
    /// Queue-scoped, paginated read over any of the three collections.
    /// `password` is always projected out, since this path is reachable from
    /// the generic "show me my queue" surface and must never leak the hash.
    pub async fn query_collection(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        collection: CollectionName,
        query: QueryFilter,
        limit: i64,
        offset: u64,
    ) -> Result<Vec<Document>> {
        let filter = sanitize_query(queue_id, query)?;
        let projection = doc! { "password": 0 };
        let sort = collection.sort();

        let mut cursor = match collection {
            CollectionName::Queues => {
                self.queues.clone_with_type::<Document>().find(filter).projection(projection)
            }
            CollectionName::Tasks => self.tasks.clone_with_type::<Document>().find(filter).projection(projection),
            CollectionName::Workers => {
                self.workers.clone_with_type::<Document>().find(filter).projection(projection)
            }
        }
        .sort(sort)
        .skip(offset)
        .limit(limit)
        .session(tx.session_mut())
        .await
        .map_err(crate::error_map::map_mongo_error)?;

        let mut out = Vec::new();
        loop {
            match cursor.next(tx.session_mut()).await {
                Some(Ok(doc)) => out.push(doc),
                Some(Err(e)) => return Err(crate::error_map::map_mongo_error(e)),
                None => break,
            }
        }
        Ok(out)
    }

    /// Queue-scoped, sanitized bulk update over any of the three
    /// collections. Returns the number of documents modified.
    pub async fn update_collection(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        collection: CollectionName,
        query: QueryFilter,
        update: Document,
    ) -> Result<u64> {
        let filter = sanitize_query(queue_id, query)?;
        let update = sanitize_update(update, self.now(), false)?;

        let result = match collection {
            CollectionName::Queues => {
                self.queues
                    .clone_with_type::<Document>()
                    .update_many(filter, update)
                    .session(tx.session_mut())
                    .await
            }
            CollectionName::Tasks => {
                self.tasks
                    .clone_with_type::<Document>()
                    .update_many(filter, update)
                    .session(tx.session_mut())
                    .await
            }
            CollectionName::Workers => {
                self.workers
                    .clone_with_type::<Document>()
                    .update_many(filter, update)
                    .session(tx.session_mut())
                    .await
            }
        }
        .map_err(crate::error_map::map_mongo_error)?;
        Ok(result.modified_count)
    }
}
