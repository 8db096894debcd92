// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker command handlers

use clap::{Args, Subcommand};
use ty_core::WorkerId;
use ty_server::Service;
use ty_storage::{sanitize::QueryFilter, CollectionName};

use crate::color;
use crate::output::{field_str, format_or_json, handle_list, OutputFormat};

use super::{parse_json_object, resolve_credential, to_exit_error};

#[derive(Args)]
pub struct WorkerArgs {
    #[command(subcommand)]
    pub command: WorkerCommand,
}

#[derive(Subcommand)]
pub enum WorkerCommand {
    /// Register a new worker with a queue
    Create {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        worker_name: Option<String>,
        #[arg(long)]
        metadata: Option<String>,
        #[arg(long)]
        max_retries: Option<u32>,
    },
    /// List workers in a queue
    Ls {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long, default_value_t = 100)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Report a worker status transition (activate/suspend/failed)
    Report {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        worker_id: String,
        /// activate, suspend, or failed
        status: String,
    },
    /// Delete a worker
    Delete {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        worker_id: String,
        /// Clear `worker_id` on every task this worker was running
        #[arg(long)]
        cascade_update: bool,
    },
}

pub async fn handle(command: WorkerCommand, service: &Service, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        WorkerCommand::Create { queue_name, password, worker_name, metadata, max_retries } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let metadata = parse_json_object(metadata.as_deref())?;
            let id = service
                .create_worker(&queue_name, &password, worker_name, metadata, max_retries)
                .await
                .map_err(to_exit_error)?;
            format_or_json(format, &id.as_str(), || println!("Created worker {id}"))?;
        }
        WorkerCommand::Ls { queue_name, password, limit, offset } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let workers = service
                .query_collection(
                    &queue_name,
                    &password,
                    CollectionName::Workers,
                    QueryFilter::default(),
                    limit,
                    offset,
                )
                .await
                .map_err(to_exit_error)?;
            handle_list(format, &workers, "No workers found", |items| {
                for item in items {
                    println!(
                        "{}  {:<10}  retries={}/{}  {}",
                        color::literal(&field_str(item, "_id")),
                        field_str(item, "status"),
                        field_str(item, "retries"),
                        field_str(item, "max_retries"),
                        field_str(item, "worker_name"),
                    );
                }
            })?;
        }
        WorkerCommand::Report { queue_name, password, worker_id, status } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let applied = service
                .report_worker_status(&queue_name, &password, &WorkerId::from_string(&worker_id), &status)
                .await
                .map_err(to_exit_error)?;
            println!("Worker {worker_id} reported {status}: {applied}");
        }
        WorkerCommand::Delete { queue_name, password, worker_id, cascade_update } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let deleted = service
                .delete_worker(&queue_name, &password, &WorkerId::from_string(&worker_id), cascade_update)
                .await
                .map_err(to_exit_error)?;
            println!("Deleted {deleted} worker(s)");
        }
    }
    Ok(())
}
