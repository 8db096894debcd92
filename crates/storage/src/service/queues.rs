// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mongodb::bson::{doc, Document};
use ty_core::{password, Error, Queue, QueueId, Result};

use super::DbService;
use crate::sanitize::add_key_prefix;
use crate::transaction::TransactionGuard;

impl DbService {
    /// `BadRequest` if `name` is empty, `Conflict` if it already exists.
    pub async fn create_queue(
        &self,
        tx: &mut TransactionGuard,
        name: &str,
        password_plain: &str,
        metadata: Option<Document>,
    ) -> Result<QueueId> {
        if name.trim().is_empty() {
            return Err(Error::bad_request("queue name must not be empty"));
        }
        let now = self.now();
        let queue = Queue {
            id: QueueId::new(),
            queue_name: name.to_string(),
            password: password::hash(password_plain)?,
            created_at: now,
            last_modified: now,
            metadata: metadata.unwrap_or_default(),
        };
        self.queues
            .insert_one(&queue)
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(queue.id)
    }

    /// Renaming to an existing name fails with `BadRequest`. Metadata update
    /// is a partial merge at `metadata.<key>`.
    pub async fn update_queue(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        new_name: Option<String>,
        new_password: Option<String>,
        metadata_update: Option<Document>,
    ) -> Result<u64> {
        if let Some(ref name) = new_name {
            let conflict = self
                .queues
                .find_one(doc! { "queue_name": name, "_id": { "$ne": queue_id.as_str() } })
                .session(tx.session_mut())
                .await
                .map_err(crate::error_map::map_mongo_error)?;
            if conflict.is_some() {
                return Err(Error::bad_request(format!("queue name already in use: {name}")));
            }
        }

        let mut set_doc = Document::new();
        if let Some(name) = new_name {
            set_doc.insert("queue_name", name);
        }
        if let Some(plain) = new_password {
            set_doc.insert("password", password::hash(&plain)?);
        }
        if let Some(metadata) = metadata_update {
            set_doc.extend(add_key_prefix(metadata, "metadata."));
        }
        set_doc.insert("last_modified", self.now());

        let result = self
            .queues
            .update_one(doc! { "_id": queue_id.as_str() }, doc! { "$set": set_doc })
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        Ok(result.modified_count)
    }

    /// Non-cascading delete leaves orphan tasks/workers; cascading also
    /// removes them.
    pub async fn delete_queue(
        &self,
        tx: &mut TransactionGuard,
        queue_id: &QueueId,
        cascade_delete: bool,
    ) -> Result<u64> {
        let result = self
            .queues
            .delete_one(doc! { "_id": queue_id.as_str() })
            .session(tx.session_mut())
            .await
            .map_err(crate::error_map::map_mongo_error)?;
        let mut affected = result.deleted_count;

        if cascade_delete {
            let tasks = self
                .tasks
                .delete_many(doc! { "queue_id": queue_id.as_str() })
                .session(tx.session_mut())
                .await
                .map_err(crate::error_map::map_mongo_error)?;
            let workers = self
                .workers
                .delete_many(doc! { "queue_id": queue_id.as_str() })
                .session(tx.session_mut())
                .await
                .map_err(crate::error_map::map_mongo_error)?;
            affected += tasks.deleted_count + workers.deleted_count;
        }

        Ok(affected)
    }

    /// Pure read, bypassing authorization (needed by the credential-resolver
    /// before a password can even be checked). `None` if not found;
    /// `BadRequest` if both `queue_id` and `queue_name` are given and
    /// disagree.
    pub async fn get_queue(
        &self,
        queue_id: Option<&QueueId>,
        queue_name: Option<&str>,
    ) -> Result<Option<Queue>> {
        match (queue_id, queue_name) {
            (Some(id), Some(name)) => {
                let found = self
                    .queues
                    .find_one(doc! { "_id": id.as_str() })
                    .await
                    .map_err(crate::error_map::map_mongo_error)?;
                match found {
                    Some(q) if q.queue_name == name => Ok(Some(q)),
                    Some(_) => Err(Error::bad_request("queue_id and queue_name disagree")),
                    None => Ok(None),
                }
            }
            (Some(id), None) => self
                .queues
                .find_one(doc! { "_id": id.as_str() })
                .await
                .map_err(crate::error_map::map_mongo_error),
            (None, Some(name)) => self
                .queues
                .find_one(doc! { "queue_name": name })
                .await
                .map_err(crate::error_map::map_mongo_error),
            (None, None) => Err(Error::bad_request("one of queue_id or queue_name is required")),
        }
    }
}
