//! Duplicate removal and primary-key validation

use crate::error::{Error, Result};
use crate::table::Table;
use std::collections::HashSet;

/// Remove exact duplicate rows, keeping the first occurrence.
/// Returns the number of rows dropped.
pub fn remove_duplicates(table: &mut Table) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    let removed = table.retain_rows(|row| seen.insert(format!("{row:?}")));
    if removed > 0 {
        tracing::info!("Removed {removed} duplicate rows");
    }
    removed
}

/// Verify every primary id is present and unique.
///
/// A null id counts as a violation, as does every repeat of an already-seen
/// id. Any violation fails the entity's run; nothing is written downstream.
pub fn validate_unique_primary_ids(table: &Table, table_name: &str, primary_key: &str) -> Result<()> {
    let Some(values) = table.column_values(primary_key) else {
        return Err(Error::config(format!(
            "table '{table_name}' has no primary key column '{primary_key}'"
        )));
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = 0;
    for value in values {
        if value.is_null() {
            duplicates += 1;
            continue;
        }
        if !seen.insert(value.to_string()) {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        return Err(Error::integrity(table_name, duplicates));
    }
    tracing::info!("All primary IDs in the {table_name} table are unique");
    Ok(())
}
