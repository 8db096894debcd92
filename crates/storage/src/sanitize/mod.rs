// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rewrites a caller-supplied filter/update document into a safe,
//! queue-scoped form (spec.md §4.3).

mod expr;

use mongodb::bson::{doc, Bson, Document};
use ty_core::{Error, QueueId, Result};

/// A caller-supplied filter, accepted in either form the original API
/// allows: a native store filter already in Mongo operator form, or a
/// restricted Python-expression-like string (`metadata.tag in ["a","b"]`).
#[derive(Debug, Clone)]
pub enum QueryFilter {
    Native(Document),
    Expr(String),
}

impl Default for QueryFilter {
    fn default() -> Self {
        QueryFilter::Native(Document::new())
    }
}

/// Operators that can escape the collection: server-side scripting, joins,
/// or merges into other collections. Rejected wherever they appear, however
/// deeply nested.
const DISALLOWED_OPERATORS: &[&str] =
    &["$where", "$function", "$accumulator", "$expr", "$lookup", "$merge", "$out", "$graphLookup"];

const IMMUTABLE_FIELDS: &[&str] = &["_id", "queue_id", "created_at", "last_modified"];
const PRIVILEGED_FIELDS: &[&str] = &["status", "retries", "password"];

fn reject_disallowed(value: &Bson) -> Result<()> {
    match value {
        Bson::Document(doc) => {
            for (k, v) in doc {
                if k.starts_with('$') && DISALLOWED_OPERATORS.contains(&k.as_str()) {
                    return Err(Error::bad_request(format!("disallowed operator: {k}")));
                }
                reject_disallowed(v)?;
            }
            Ok(())
        }
        Bson::Array(items) => {
            for v in items {
                reject_disallowed(v)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Build a safe, queue-scoped filter from a caller-supplied [`QueryFilter`].
/// Always conjuncts `queue_id == <authenticated queue id>` at the top level.
pub fn sanitize_query(queue_id: &QueueId, filter: QueryFilter) -> Result<Document> {
    let body = match filter {
        QueryFilter::Native(doc) => doc,
        QueryFilter::Expr(src) if src.trim().is_empty() => Document::new(),
        QueryFilter::Expr(src) => expr::parse_expr(&src)?,
    };
    reject_disallowed(&Bson::Document(body.clone()))?;

    let scope = doc! { "queue_id": queue_id.as_str() };
    if body.is_empty() {
        Ok(scope)
    } else {
        Ok(doc! { "$and": [scope, body] })
    }
}

/// Strip immutable/privileged fields from a caller-supplied update document
/// and stamp `last_modified`. `privileged` allows `status`/`retries` through
/// for the service-internal report path; external callers always pass
/// `false`. `password` is never allowed through this function — callers that
/// legitimately rotate a password go through `DbService::update_queue`,
/// which hashes it before it ever reaches here.
pub fn sanitize_update(update: Document, now: chrono::DateTime<chrono::Utc>, privileged: bool) -> Result<Document> {
    reject_disallowed(&Bson::Document(update.clone()))?;

    let mut set_doc = update.get_document("$set").cloned().unwrap_or(update);

    for field in IMMUTABLE_FIELDS {
        if set_doc.remove(*field).is_some() {
            return Err(Error::bad_request(format!("cannot modify immutable field: {field}")));
        }
    }
    for field in PRIVILEGED_FIELDS {
        let touches = set_doc.contains_key(*field);
        if touches && (!privileged || *field == "password") {
            return Err(Error::bad_request(format!(
                "cannot modify privileged field via this path: {field}"
            )));
        }
    }

    set_doc.insert("last_modified", now);
    Ok(doc! { "$set": set_doc })
}

/// Rewrite `{k: v, ...}` to `{"<prefix>k": v, ...}`, for partial
/// `metadata.*`/`summary.*` updates.
pub fn add_key_prefix(update: Document, prefix: &str) -> Document {
    let mut out = Document::new();
    for (k, v) in update {
        out.insert(format!("{prefix}{k}"), v);
    }
    out
}

/// Expand `required_fields` into `args.<path>` equality clauses for the
/// DB-side candidate pre-filter (fetch_task step 3).
pub fn required_fields_prefilter(required: &Document) -> Document {
    add_key_prefix(required.clone(), "args.")
}

/// Dotted-path structural equality of `required` against `args`, used to
/// re-verify a fetch candidate in-process (fetch_task step 5) since the
/// DB-side filter above is only a conservative pre-filter.
pub fn arg_match(args: &Document, required: &Document) -> bool {
    required.iter().all(|(path, expected)| lookup_path(args, path).as_ref() == Some(expected))
}

fn lookup_path(doc: &Document, path: &str) -> Option<Bson> {
    let mut current = Bson::Document(doc.clone());
    for segment in path.split('.') {
        match current {
            Bson::Document(d) => current = d.get(segment)?.clone(),
            _ => return None,
        }
    }
    Some(current)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
