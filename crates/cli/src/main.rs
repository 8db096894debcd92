// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ty`: a thin clap-based command surface mapping 1:1 onto `ty_server::Service`
//! operations. No network transport sits between this binary and the store —
//! it connects directly, the way the teacher's CLI binary talks to its own
//! daemon process over a local socket instead of HTTP.

mod color;
mod commands;
mod exit_error;
mod output;

use clap::Parser;
use ty_server::{Service, ServerConfig};
use ty_storage::DbService;

use commands::config::{CliConfig, ConfigArgs};
use commands::queue::QueueArgs;
use commands::task::TaskArgs;
use commands::worker::WorkerArgs;
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "ty",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Client for the ty task-queue coordination service",
    styles = color::styles()
)]
struct Cli {
    /// Store connection URI (overrides config file and TY_MONGO_URI)
    #[arg(long, global = true)]
    mongo_uri: Option<String>,
    /// Database name (overrides config file and TY_DB_NAME)
    #[arg(long, global = true)]
    db_name: Option<String>,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Manage queues
    Queue(QueueArgs),
    /// Manage tasks
    Task(TaskArgs),
    /// Manage workers
    Worker(WorkerArgs),
    /// Manage local CLI configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        let code = err.downcast_ref::<ExitError>().map(|e| e.code).unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config subcommand never needs a store connection.
    if let Command::Config(args) = cli.command {
        return commands::config::handle(args.command);
    }

    let defaults = CliConfig::load().unwrap_or_default();
    let env_config = ServerConfig::from_env();
    let mongo_uri = cli.mongo_uri.or(defaults.mongo_uri).unwrap_or(env_config.mongo_uri);
    let db_name = cli.db_name.or(defaults.db_name).unwrap_or(env_config.db_name);

    ty_server::logging::init_tracing(&env_config.log_level);

    let storage = DbService::connect(&mongo_uri, &db_name).await?;
    let service = Service::new(storage);

    let result = match cli.command {
        Command::Queue(args) => commands::queue::handle(args.command, &service, cli.format).await,
        Command::Task(args) => commands::task::handle(args.command, &service, cli.format).await,
        Command::Worker(args) => commands::worker::handle(args.command, &service, cli.format).await,
        Command::Config(_) => unreachable!("handled above"),
    };

    service.close().await;
    result
}
