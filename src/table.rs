//! In-flight tabular data model and CSV serialization
//!
//! A [`Table`] is the unit the cleaning stages operate on: an ordered column
//! list plus rows of scalar [`Field`]s. Dynamic JSON stops at the extraction
//! boundary; everything past it uses this typed representation.

use crate::error::Result;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// A single scalar cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Absent or unparsable value
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Field {
    /// Convert a JSON value into a cell.
    ///
    /// Arrays and objects should not survive projection, but if one does it is
    /// serialized rather than dropped so the data stays visible downstream.
    pub fn from_json(value: &Value) -> Field {
        match value {
            Value::Null => Field::Null,
            Value::Bool(b) => Field::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Field::Int(i)
                } else {
                    Field::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Field::Str(s.clone()),
            other => Field::Str(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// Numeric view of the cell, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Field::Int(i) => Some(*i as f64),
            Field::Float(f) => Some(*f),
            Field::Str(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Null => Ok(()),
            Field::Bool(b) => write!(f, "{b}"),
            Field::Int(i) => write!(f, "{i}"),
            Field::Float(v) => write!(f, "{v}"),
            Field::Str(s) => f.write_str(s),
        }
    }
}

/// Ordered columns plus rows of cells
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Field>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from flat records, in record order.
    ///
    /// Output column names are the projection fields with dotted paths
    /// flattened (`location.lat` becomes `location_lat`). Fields absent from
    /// a record become null cells.
    pub fn from_records(projection: &[&str], records: &[serde_json::Map<String, Value>]) -> Table {
        let columns: Vec<String> = projection.iter().map(|c| c.replace('.', "_")).collect();
        let mut table = Table::new(columns);
        for record in records {
            let row = table
                .columns
                .iter()
                .map(|column| {
                    record
                        .get(column)
                        .map_or(Field::Null, Field::from_json)
                })
                .collect();
            table.rows.push(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Field>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a row; the caller must match the column count
    pub fn push_row(&mut self, row: Vec<Field>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Keep only rows the predicate accepts, returning the number removed
    pub fn retain_rows<F: FnMut(&[Field]) -> bool>(&mut self, mut keep: F) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        before - self.rows.len()
    }

    /// Apply a transform to every cell of a column; no-op if the column is absent
    pub fn map_column<F: FnMut(Field) -> Field>(&mut self, name: &str, mut f: F) {
        let Some(idx) = self.column_index(name) else {
            return;
        };
        for row in &mut self.rows {
            let cell = std::mem::replace(&mut row[idx], Field::Null);
            row[idx] = f(cell);
        }
    }

    /// Rename a column in place; no-op if absent
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(idx) = self.column_index(from) {
            self.columns[idx] = to.to_string();
        }
    }

    /// Insert a new column at `index` with one value per existing row
    pub fn insert_column(&mut self, index: usize, name: &str, values: Vec<Field>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.insert(index, name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(index, value);
        }
    }

    /// Reorder (and restrict) the table to exactly the named columns
    pub fn select_columns(&mut self, order: &[&str]) -> Result<()> {
        let indices: Vec<usize> = order
            .iter()
            .map(|name| {
                self.column_index(name).ok_or_else(|| {
                    crate::error::Error::config(format!("missing column '{name}' in table"))
                })
            })
            .collect::<Result<_>>()?;

        self.columns = order.iter().map(|c| (*c).to_string()).collect();
        for row in &mut self.rows {
            let reordered: Vec<Field> = indices.iter().map(|&i| row[i].clone()).collect();
            *row = reordered;
        }
        Ok(())
    }

    /// Borrow every cell of a column, in row order
    pub fn column_values(&self, name: &str) -> Option<Vec<&Field>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Render the table as CSV: header row plus one line per record
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(
            &self
                .columns
                .iter()
                .map(|c| csv_escape(c))
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push('\n');
        for row in &self.rows {
            let line = row
                .iter()
                .map(|cell| csv_escape(&cell.to_string()))
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Write the CSV artifact to disk
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_csv())?;
        Ok(())
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or line break
fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') || text.contains('\r') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: serde_json::Value) -> serde_json::Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_from_records_flattens_dotted_columns() {
        let records = vec![record(json!({
            "charger_id": "CH-1",
            "location_lat": 47.37,
            "location_lon": 8.54
        }))];
        let table = Table::from_records(
            &["charger_id", "location.lat", "location.lon"],
            &records,
        );
        assert_eq!(
            table.columns(),
            &["charger_id", "location_lat", "location_lon"]
        );
        assert_eq!(table.rows()[0][1], Field::Float(47.37));
    }

    #[test]
    fn test_missing_fields_become_null() {
        let records = vec![record(json!({"user_id": "U-1"}))];
        let table = Table::from_records(&["user_id", "email"], &records);
        assert_eq!(table.rows()[0][1], Field::Null);
    }

    #[test]
    fn test_csv_quoting() {
        let mut table = Table::new(vec!["city".to_string(), "note".to_string()]);
        table.push_row(vec![
            Field::Str("Biel, Bienne".to_string()),
            Field::Str("said \"ok\"".to_string()),
        ]);
        let csv = table.to_csv();
        assert_eq!(csv, "city,note\n\"Biel, Bienne\",\"said \"\"ok\"\"\"\n");
    }

    #[test]
    fn test_null_renders_empty() {
        let mut table = Table::new(vec!["a".to_string(), "b".to_string()]);
        table.push_row(vec![Field::Null, Field::Int(7)]);
        assert_eq!(table.to_csv(), "a,b\n,7\n");
    }

    #[test]
    fn test_select_columns_reorders() {
        let mut table = Table::new(vec!["b".to_string(), "a".to_string()]);
        table.push_row(vec![Field::Int(2), Field::Int(1)]);
        table.select_columns(&["a", "b"]).unwrap();
        assert_eq!(table.columns(), &["a", "b"]);
        assert_eq!(table.rows()[0], vec![Field::Int(1), Field::Int(2)]);
    }

    #[test]
    fn test_select_columns_missing_fails() {
        let mut table = Table::new(vec!["a".to_string()]);
        assert!(table.select_columns(&["a", "missing"]).is_err());
    }

    #[test]
    fn test_retain_rows_reports_removed() {
        let mut table = Table::new(vec!["n".to_string()]);
        for i in 0..5 {
            table.push_row(vec![Field::Int(i)]);
        }
        let removed = table.retain_rows(|row| row[0].as_f64().unwrap() < 3.0);
        assert_eq!(removed, 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_numbers_stay_numeric_in_csv() {
        let mut table = Table::new(vec!["kWh_consumed".to_string(), "amount".to_string()]);
        table.push_row(vec![Field::Float(12.5), Field::Int(30)]);
        assert_eq!(table.to_csv(), "kWh_consumed,amount\n12.5,30\n");
    }
}
