// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod config;
pub mod queue;
pub mod task;
pub mod worker;

use ty_core::Error;

use crate::exit_error::ExitError;

/// Map the shared error taxonomy onto a process exit code — each variant
/// already carries the transport status it should surface; here the
/// "transport" is the shell.
pub fn to_exit_error(err: Error) -> ExitError {
    let code = match &err {
        Error::BadRequest(_) => 2,
        Error::Unauthorized(_) => 3,
        Error::Forbidden(_) => 4,
        Error::NotFound(_) => 5,
        Error::Conflict(_) => 6,
        Error::Internal(_) => 1,
    };
    ExitError::new(code, err.to_string())
}

/// Parse a `--metadata`/`--args`/`--set`/`--summary` style JSON-object flag
/// into a store document, leaving the field unset entirely when no flag was
/// given (as opposed to an explicit `{}`).
pub fn parse_json_object(raw: Option<&str>) -> anyhow::Result<Option<mongodb::bson::Document>> {
    let Some(raw) = raw else { return Ok(None) };
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        anyhow::bail!("expected a JSON object, got: {raw}");
    }
    let doc = mongodb::bson::to_document(&value)?;
    Ok(Some(doc))
}

/// Resolve `(queue_name, password)` from explicit flags, falling back to the
/// persisted CLI defaults (`ty config set --queue-name ... --password ...`)
/// so routine commands don't have to repeat both on every invocation.
pub fn resolve_credential(
    queue_name: Option<String>,
    password: Option<String>,
) -> anyhow::Result<(String, String)> {
    let defaults = config::CliConfig::load().unwrap_or_default();
    let queue_name = queue_name
        .or(defaults.queue_name)
        .ok_or_else(|| anyhow::anyhow!("no queue name given; pass --queue-name or run `ty config set --queue-name ...`"))?;
    let password = password
        .or(defaults.password)
        .ok_or_else(|| anyhow::anyhow!("no password given; pass --password or run `ty config set --password ...`"))?;
    Ok((queue_name, password))
}
