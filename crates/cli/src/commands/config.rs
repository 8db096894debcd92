// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local CLI configuration: connection defaults and a remembered queue
//! credential, so `ty task ...` doesn't need `--queue-name`/`--password` on
//! every invocation. Grounded on the project-root config discovery used
//! throughout the daemon crate, simplified to a single file since `ty` has
//! no workspace concept of its own.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};

use crate::color;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration (password redacted)
    Show {},
    /// Persist connection and/or credential defaults
    Set {
        /// Store connection URI (TY_MONGO_URI overrides this at runtime)
        #[arg(long)]
        mongo_uri: Option<String>,
        /// Database name (TY_DB_NAME overrides this at runtime)
        #[arg(long)]
        db_name: Option<String>,
        /// Default queue name used when `--queue-name` is omitted
        #[arg(long)]
        queue_name: Option<String>,
        /// Default queue password used when `--password` is omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Print the path to the config file on disk
    Path {},
}

/// Persisted CLI defaults. Every field is optional: an unset field falls
/// back to the built-in `ServerConfig` default or must be supplied on the
/// command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub mongo_uri: Option<String>,
    #[serde(default)]
    pub db_name: Option<String>,
    #[serde(default)]
    pub queue_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CliConfig {
    /// `$XDG_CONFIG_HOME/ty/config.json` (or the platform equivalent via
    /// `dirs::config_dir`), falling back to `./.ty-config.json` when no
    /// config directory can be resolved (e.g. a minimal container).
    pub fn path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("ty").join("config.json"),
            None => PathBuf::from(".ty-config.json"),
        }
    }

    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

pub fn handle(command: ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Show {} => {
            let config = CliConfig::load()?;
            println!("{}: {}", color::header("config file"), CliConfig::path().display());
            println!("{}: {}", color::literal("mongo_uri"), config.mongo_uri.as_deref().unwrap_or("(default)"));
            println!("{}: {}", color::literal("db_name"), config.db_name.as_deref().unwrap_or("(default)"));
            println!("{}: {}", color::literal("queue_name"), config.queue_name.as_deref().unwrap_or("(unset)"));
            println!(
                "{}: {}",
                color::literal("password"),
                if config.password.is_some() { "(set)" } else { "(unset)" }
            );
        }
        ConfigCommand::Set { mongo_uri, db_name, queue_name, password } => {
            let mut config = CliConfig::load()?;
            if mongo_uri.is_some() {
                config.mongo_uri = mongo_uri;
            }
            if db_name.is_some() {
                config.db_name = db_name;
            }
            if queue_name.is_some() {
                config.queue_name = queue_name;
            }
            if password.is_some() {
                config.password = password;
            }
            config.save()?;
            println!("Saved {}", CliConfig::path().display());
        }
        ConfigCommand::Path {} => {
            println!("{}", CliConfig::path().display());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
