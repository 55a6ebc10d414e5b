//! Record extraction and reconciliation
//!
//! Reads the raw per-entity JSON documents and produces flat records: maps
//! restricted to exactly the entity's projection schema, with absent source
//! fields mapped to null. For transactions the extractor also reconciles
//! against payments by session id and repairs missing end times on failed
//! sessions. This is the only layer that handles arbitrary JSON shapes.

use crate::entity::Entity;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// A record restricted to an entity's projection, all nesting resolved.
/// Keys are the flattened column names (`location.lat` → `location_lat`).
pub type FlatRecord = Map<String, Value>;

/// Extract the flat records for one entity from a source directory.
///
/// Purely functional: reads the entity's JSON file(s) fresh and returns one
/// flat record per source element, in source file order.
pub fn extract(dir: &Path, entity: Entity) -> Result<Vec<FlatRecord>> {
    match entity {
        Entity::Users | Entity::Chargers => {
            let file = entity.source_files()[0];
            let raw = load_json_array(&dir.join(file))?;
            Ok(raw
                .iter()
                .map(|record| project(record, entity.projection()))
                .collect())
        }
        Entity::Transactions => extract_transactions(dir),
    }
}

/// Load a JSON array file; missing files and malformed JSON are fatal for the
/// entity's run and propagate to the caller.
fn load_json_array(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(Error::config(format!(
            "{}: expected a top-level JSON array",
            path.display()
        ))),
    }
}

/// Project a raw record onto the entity's columns.
///
/// Dotted fields walk the nested mapping segment by segment; the walk yields
/// null the instant a segment is missing or the current value is not an
/// object.
fn project(record: &Value, projection: &[&str]) -> FlatRecord {
    let mut flat = Map::new();
    for field in projection {
        let value = if field.contains('.') {
            walk_path(record, field)
        } else {
            record.get(*field).cloned().unwrap_or(Value::Null)
        };
        flat.insert(field.replace('.', "_"), value);
    }
    flat
}

fn walk_path(record: &Value, path: &str) -> Value {
    let mut current = record;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return Value::Null,
        }
    }
    current.clone()
}

/// Combine transactions with payments, keyed by `session_id`.
///
/// The join map is built fresh per run; when two payments share a session id
/// the later one in file order wins. Output order follows the transactions
/// file.
fn extract_transactions(dir: &Path) -> Result<Vec<FlatRecord>> {
    let transactions = load_json_array(&dir.join("transactions.json"))?;
    let payments = load_json_array(&dir.join("payments.json"))?;

    let mut payment_map: HashMap<String, &Value> = HashMap::new();
    for payment in &payments {
        if let Some(session_id) = key_string(payment.get("session_id")) {
            payment_map.insert(session_id, payment);
        }
    }

    let projection = Entity::Transactions.projection();
    let mut records = Vec::with_capacity(transactions.len());
    for transaction in &transactions {
        let mut flat = project(transaction, projection);

        if let Some(payment) =
            key_string(transaction.get("session_id")).and_then(|id| payment_map.get(&id))
        {
            flat.insert(
                "amount".to_string(),
                payment.get("amount").cloned().unwrap_or(Value::Null),
            );
            flat.insert(
                "currency".to_string(),
                payment.get("currency").cloned().unwrap_or(Value::Null),
            );
        }

        // Failed sessions end exactly when they start
        if flat.get("status").and_then(Value::as_str) == Some("failed")
            && is_falsy(flat.get("end_time"))
        {
            let start = flat.get("start_time").cloned().unwrap_or(Value::Null);
            flat.insert("end_time".to_string(), start);
        }

        records.push(flat);
    }
    Ok(records)
}

/// Render a join key as a string so numeric and textual ids compare alike
fn key_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Null, missing, empty string, and false all count as "no end time"
fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        _ => false,
    }
}
