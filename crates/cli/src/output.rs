// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared text/JSON output-format plumbing for every `ty` subcommand.

use clap::ValueEnum;
use mongodb::bson::{Bson, Document};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Convert a store document to a JSON value for `--format json` output.
/// Relaxed extended JSON renders dates/ids as plain strings rather than the
/// `{"$date": ...}` wrapper canonical extended JSON uses, which reads better
/// on a terminal and round-trips through `jq` without surprises.
pub fn doc_to_json(doc: &Document) -> serde_json::Value {
    Bson::Document(doc.clone()).into_relaxed_extjson()
}

/// Render a single document or scalar result as text or JSON.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Text => text_fn(),
    }
    Ok(())
}

/// Render a list of documents as text or JSON, handling the empty case.
pub fn handle_list(
    format: OutputFormat,
    items: &[Document],
    empty_msg: &str,
    render_text: impl FnOnce(&[Document]),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = items.iter().map(doc_to_json).collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{empty_msg}");
            } else {
                render_text(items);
            }
        }
    }
    Ok(())
}

/// Print one field from a document, falling back to `-` when absent,
/// skipping the raw ObjectId-style braces a bare `Bson::to_string` would
/// otherwise print.
pub fn field_str(doc: &Document, key: &str) -> String {
    match doc.get(key) {
        Some(Bson::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
