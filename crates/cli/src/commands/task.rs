// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task command handlers

use clap::{Args, Subcommand};
use ty_core::{TaskCmd, TaskId, WorkerId};
use ty_server::Service;
use ty_storage::{sanitize::QueryFilter, CollectionName, FetchTaskArgs};

use crate::color;
use crate::output::{field_str, format_or_json, handle_list, OutputFormat};

use super::{parse_json_object, resolve_credential, to_exit_error};

#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Submit a new task to a queue
    Submit {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Human-readable task name
        #[arg(long)]
        task_name: Option<String>,
        /// Task arguments as a JSON object, matched by `fetch --required-fields`
        #[arg(long)]
        args: Option<String>,
        /// Shell command to run, as a single string (repeat for an argv array)
        #[arg(long = "cmd")]
        cmd: Vec<String>,
        #[arg(long)]
        metadata: Option<String>,
        #[arg(long)]
        heartbeat_timeout: Option<f64>,
        #[arg(long)]
        task_timeout: Option<f64>,
        #[arg(long)]
        max_retries: Option<u32>,
        #[arg(long)]
        priority: Option<i64>,
    },
    /// List tasks in a queue
    Ls {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Restrict to tasks with this status (PENDING/RUNNING/SUCCESS/FAILED/CANCELLED)
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 100)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Apply a raw settings update to a task
    Update {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        task_id: String,
        /// Fields to set, as a JSON object
        #[arg(long)]
        set: Option<String>,
        /// Reset status to PENDING and retries to 0
        #[arg(long)]
        reset_pending: bool,
    },
    /// Cancel a task
    Cancel {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        task_id: String,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        task_id: String,
    },
    /// Report a terminal outcome for a task (success/failed/cancelled)
    Report {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        task_id: String,
        /// success, failed, or cancelled
        status: String,
        /// Reporting worker id; omit for the privileged/administrative path
        #[arg(long)]
        worker_id: Option<String>,
        /// Fields to merge under `summary.*`, as a JSON object
        #[arg(long)]
        summary: Option<String>,
    },
    /// Fetch the next pending task for a worker to run
    Fetch {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        worker_id: Option<String>,
        /// Maximum seconds the task may run before the sweeper considers it
        /// timed out; required with `--no-heartbeat`
        #[arg(long)]
        eta_max: Option<f64>,
        #[arg(long)]
        heartbeat_timeout: Option<f64>,
        /// Don't start an initial heartbeat (requires `--eta-max`)
        #[arg(long)]
        no_heartbeat: bool,
        /// `args.<path>` equality constraints the candidate must satisfy, as a JSON object
        #[arg(long)]
        required_fields: Option<String>,
    },
    /// Refresh a running task's heartbeat
    Heartbeat {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        task_id: String,
    },
}

pub async fn handle(command: TaskCommand, service: &Service, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        TaskCommand::Submit {
            queue_name,
            password,
            task_name,
            args,
            cmd,
            metadata,
            heartbeat_timeout,
            task_timeout,
            max_retries,
            priority,
        } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let args = parse_json_object(args.as_deref())?;
            let cmd = match cmd.len() {
                0 => None,
                1 => Some(TaskCmd::Single(cmd.into_iter().next().unwrap())),
                _ => Some(TaskCmd::Args(cmd)),
            };
            let metadata = parse_json_object(metadata.as_deref())?;
            let id = service
                .create_task(
                    &queue_name,
                    &password,
                    task_name,
                    args,
                    metadata,
                    cmd,
                    heartbeat_timeout,
                    task_timeout,
                    max_retries,
                    priority,
                )
                .await
                .map_err(to_exit_error)?;
            format_or_json(format, &id.as_str(), || println!("Submitted task {id}"))?;
        }
        TaskCommand::Ls { queue_name, password, status, limit, offset } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let filter = match status {
                Some(s) => QueryFilter::Native(mongodb::bson::doc! { "status": s }),
                None => QueryFilter::default(),
            };
            let tasks = service
                .query_collection(&queue_name, &password, CollectionName::Tasks, filter, limit, offset)
                .await
                .map_err(to_exit_error)?;
            handle_list(format, &tasks, "No tasks found", |items| {
                for item in items {
                    println!(
                        "{}  {:<10}  priority={}  {}",
                        color::literal(&field_str(item, "_id")),
                        field_str(item, "status"),
                        field_str(item, "priority"),
                        field_str(item, "task_name"),
                    );
                }
            })?;
        }
        TaskCommand::Update { queue_name, password, task_id, set, reset_pending } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let set = parse_json_object(set.as_deref())?;
            let modified = service
                .update_task(&queue_name, &password, &TaskId::from_string(&task_id), set, reset_pending)
                .await
                .map_err(to_exit_error)?;
            println!("Task {task_id} updated: {modified}");
        }
        TaskCommand::Cancel { queue_name, password, task_id } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let cancelled = service
                .cancel_task(&queue_name, &password, &TaskId::from_string(&task_id))
                .await
                .map_err(to_exit_error)?;
            println!("Task {task_id} cancelled: {cancelled}");
        }
        TaskCommand::Delete { queue_name, password, task_id } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let deleted = service
                .delete_task(&queue_name, &password, &TaskId::from_string(&task_id))
                .await
                .map_err(to_exit_error)?;
            println!("Deleted {deleted} task(s)");
        }
        TaskCommand::Report { queue_name, password, task_id, status, worker_id, summary } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let summary = parse_json_object(summary.as_deref())?;
            let task_id = TaskId::from_string(&task_id);
            let applied = match worker_id {
                Some(worker_id) => service
                    .worker_report_task_status(
                        &queue_name,
                        &password,
                        &task_id,
                        &WorkerId::from_string(&worker_id),
                        &status,
                        summary,
                    )
                    .await
                    .map_err(to_exit_error)?,
                None => service
                    .report_task_status(&queue_name, &password, &task_id, &status, summary)
                    .await
                    .map_err(to_exit_error)?,
            };
            println!("Task {task_id} reported {status}: {applied}");
        }
        TaskCommand::Fetch {
            queue_name,
            password,
            worker_id,
            eta_max,
            heartbeat_timeout,
            no_heartbeat,
            required_fields,
        } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let required_fields = parse_json_object(required_fields.as_deref())?;
            let args = FetchTaskArgs {
                worker_id: worker_id.map(WorkerId::from_string),
                eta_max,
                heartbeat_timeout,
                start_heartbeat: !no_heartbeat,
                required_fields,
                extra_filter: None,
            };
            let task = service.fetch_task(&queue_name, &password, args).await.map_err(to_exit_error)?;
            match task {
                None => println!("No pending task available"),
                Some(doc) => handle_list(format, std::slice::from_ref(&doc), "No pending task available", |items| {
                    for item in items {
                        println!("Fetched task {}", color::header(&field_str(item, "_id")));
                    }
                })?,
            }
        }
        TaskCommand::Heartbeat { queue_name, password, task_id } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let refreshed = service
                .refresh_task_heartbeat(&queue_name, &password, &TaskId::from_string(&task_id))
                .await
                .map_err(to_exit_error)?;
            println!("Task {task_id} heartbeat refreshed: {refreshed}");
        }
    }
    Ok(())
}
