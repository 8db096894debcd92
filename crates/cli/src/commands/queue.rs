// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue command handlers

use clap::{Args, Subcommand};
use ty_server::Service;

use crate::color;
use crate::output::{field_str, format_or_json, handle_list, OutputFormat};

use super::{parse_json_object, resolve_credential, to_exit_error};

#[derive(Args)]
pub struct QueueArgs {
    #[command(subcommand)]
    pub command: QueueCommand,
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// Create a new queue
    Create {
        /// Queue name (must be unique)
        name: String,
        /// Queue password, required for every later operation on this queue
        #[arg(long)]
        password: String,
        /// Arbitrary metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Update a queue's name, password, or metadata
    Update {
        /// Queue name (use `--queue-name` if it differs from the default)
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// New queue name
        #[arg(long)]
        new_name: Option<String>,
        /// New queue password
        #[arg(long)]
        new_password: Option<String>,
        /// Metadata fields to merge as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Delete a queue
    Delete {
        #[arg(long)]
        queue_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Also delete every task and worker owned by this queue
        #[arg(long)]
        cascade: bool,
    },
    /// Show a queue by name (no credential required)
    Get {
        /// Queue name
        name: String,
    },
}

pub async fn handle(command: QueueCommand, service: &Service, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        QueueCommand::Create { name, password, metadata } => {
            let metadata = parse_json_object(metadata.as_deref())?;
            let id = service.create_queue(&name, &password, metadata).await.map_err(to_exit_error)?;
            format_or_json(format, &id.as_str(), || {
                println!("Created queue '{}' ({})", color::header(&name), id);
            })?;
        }
        QueueCommand::Update { queue_name, password, new_name, new_password, metadata } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let metadata = parse_json_object(metadata.as_deref())?;
            let modified = service
                .update_queue(&queue_name, &password, new_name, new_password, metadata)
                .await
                .map_err(to_exit_error)?;
            println!("Updated queue '{}' ({} field(s) modified)", color::header(&queue_name), modified);
        }
        QueueCommand::Delete { queue_name, password, cascade } => {
            let (queue_name, password) = resolve_credential(queue_name, password)?;
            let deleted = service.delete_queue(&queue_name, &password, cascade).await.map_err(to_exit_error)?;
            println!("Deleted queue '{}' (cascade removed {} document(s))", color::header(&queue_name), deleted);
        }
        QueueCommand::Get { name } => {
            let queue = service.get_queue(None, Some(&name)).await.map_err(to_exit_error)?;
            match queue {
                None => println!("No queue named '{name}'"),
                Some(doc) => handle_list(format, std::slice::from_ref(&doc), "No queue found", |items| {
                    for item in items {
                        println!(
                            "{}  {}  created {}",
                            color::literal(&field_str(item, "_id")),
                            field_str(item, "queue_name"),
                            field_str(item, "created_at"),
                        );
                    }
                })?,
            }
        }
    }
    Ok(())
}
