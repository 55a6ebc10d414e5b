//! DuckDB-backed warehouse engine

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::warehouse::types::{
    AnalyticsFilter, ChargerFilter, TransactionFilter, UsageAnalytics, UserFilter,
};
use duckdb::Connection;
use serde_json::Value;
use std::path::Path;

/// Warehouse engine over a DuckDB connection
///
/// Tables carry the entity names (`users`, `chargers`, `transactions`) and
/// are replaced wholesale on every load, so reloading the same artifacts is
/// idempotent.
pub struct WarehouseEngine {
    conn: Connection,
}

impl WarehouseEngine {
    /// Open an in-memory warehouse
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::warehouse(format!("Failed to create DuckDB connection: {e}")))?;
        Ok(Self { conn })
    }

    /// Open (or create) a file-backed warehouse
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::warehouse(format!("Failed to open warehouse: {e}")))?;
        Ok(Self { conn })
    }

    /// Verify the connection answers a trivial query
    pub fn check_connection(&self) -> Result<()> {
        self.conn
            .execute("SELECT 1", [])
            .map_err(|e| Error::warehouse(format!("Connection check failed: {e}")))?;
        Ok(())
    }

    /// Load a cleaned CSV artifact into the entity's table, replacing any
    /// previous contents. Returns the number of rows loaded.
    pub fn load_csv(&self, entity: Entity, path: &Path) -> Result<usize> {
        let table = entity.table_name();
        let csv_path = path
            .to_str()
            .ok_or_else(|| Error::warehouse(format!("Invalid CSV path: {}", path.display())))?;
        let sql = format!(
            "CREATE OR REPLACE TABLE {table} AS SELECT * FROM read_csv('{}', header = true);",
            escape(csv_path)
        );
        self.conn
            .execute_batch(&sql)
            .map_err(|e| Error::warehouse(format!("Failed to load {table}: {e}")))?;

        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(|e| Error::warehouse(format!("Failed to count {table}: {e}")))?;

        tracing::info!("Loaded {count} rows into the {table} table");
        Ok(count as usize)
    }

    /// List users matching the filters, as JSON records in table order
    pub fn users(&self, filter: &UserFilter) -> Result<Vec<Value>> {
        let mut conditions = Vec::new();
        if let Some(user_id) = &filter.user_id {
            conditions.push(exact_id("user_id", user_id));
        }
        if let Some(first_name) = &filter.first_name {
            conditions.push(substring("first_name", first_name));
        }
        if let Some(last_name) = &filter.last_name {
            conditions.push(substring("last_name", last_name));
        }
        if let Some(email) = &filter.email {
            conditions.push(substring("email", email));
        }
        self.select_json("users", &conditions)
    }

    /// List chargers matching the filters
    pub fn chargers(&self, filter: &ChargerFilter) -> Result<Vec<Value>> {
        let mut conditions = Vec::new();
        if let Some(charger_id) = &filter.charger_id {
            conditions.push(exact_id("charger_id", charger_id));
        }
        if let Some(city) = &filter.city {
            conditions.push(substring("city", city));
        }
        self.select_json("chargers", &conditions)
    }

    /// List transactions (with joined payment fields) matching the filters
    pub fn transactions_extended(&self, filter: &TransactionFilter) -> Result<Vec<Value>> {
        let mut conditions = Vec::new();
        if let Some(min_kwh) = filter.min_kwh {
            conditions.push(format!("\"kWh_consumed\" >= {min_kwh}"));
        }
        if let Some(max_kwh) = filter.max_kwh {
            conditions.push(format!("\"kWh_consumed\" <= {max_kwh}"));
        }
        if let Some(min_amount) = filter.min_amount_charged {
            conditions.push(format!("amount >= {min_amount}"));
        }
        if let Some(max_amount) = filter.max_amount_charged {
            conditions.push(format!("amount <= {max_amount}"));
        }
        if let Some(user_id) = &filter.user_id {
            conditions.push(exact_id("user_id", user_id));
        }
        if let Some(charger_id) = &filter.charger_id {
            conditions.push(exact_id("charger_id", charger_id));
        }
        if let Some(start) = &filter.start_datetime {
            conditions.push(format!("start_time >= '{}'", escape(start)));
        }
        if let Some(end) = &filter.end_datetime {
            conditions.push(format!("end_time <= '{}'", escape(end)));
        }
        self.select_json("transactions", &conditions)
    }

    /// Aggregate usage figures for one charger over its matching transactions
    pub fn usage_analytics(
        &self,
        charger_id: &str,
        filter: &AnalyticsFilter,
    ) -> Result<UsageAnalytics> {
        let mut conditions = vec![exact_id("charger_id", charger_id)];
        if let Some(start) = &filter.start_datetime {
            conditions.push(format!("start_time >= '{}'", escape(start)));
        }
        if let Some(end) = &filter.end_datetime {
            conditions.push(format!("end_time <= '{}'", escape(end)));
        }
        if let Some(status) = &filter.status {
            conditions.push(format!("status = '{}'", escape(status)));
        }

        let sql = format!(
            "SELECT COUNT(*), \
             CAST(SUM(\"kWh_consumed\") AS DOUBLE), \
             CAST(MAX(\"kWh_consumed\") AS DOUBLE), \
             CAST(MIN(\"kWh_consumed\") AS DOUBLE), \
             CAST(AVG(\"kWh_consumed\") AS DOUBLE), \
             CAST(MEDIAN(\"kWh_consumed\") AS DOUBLE) \
             FROM transactions WHERE {}",
            conditions.join(" AND ")
        );

        self.conn
            .query_row(&sql, [], |row| {
                Ok(UsageAnalytics {
                    charger_id: charger_id.to_string(),
                    total_transactions: row.get(0)?,
                    total_kwh: row.get(1)?,
                    biggest_transaction_kwh: row.get(2)?,
                    smallest_transaction_kwh: row.get(3)?,
                    average_transaction_kwh: row.get(4)?,
                    median_transaction_kwh: row.get(5)?,
                })
            })
            .map_err(|e| Error::warehouse(format!("Analytics query failed: {e}")))
    }

    /// Run a filtered SELECT and return the rows as JSON records.
    ///
    /// DuckDB's native JSON export goes through a temp file; that keeps the
    /// type mapping (timestamps, decimals) in DuckDB's hands.
    fn select_json(&self, table: &str, conditions: &[String]) -> Result<Vec<Value>> {
        let mut query = format!("SELECT * FROM {table}");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        tracing::debug!("Executing query: {query}");

        let temp_file = std::env::temp_dir().join(format!("voltflow_query_{}.json", temp_token()));
        let temp_path = temp_file
            .to_str()
            .ok_or_else(|| Error::warehouse("Invalid temp path"))?;

        let copy_sql = format!("COPY ({query}) TO '{temp_path}' (FORMAT JSON, ARRAY true);");
        self.conn
            .execute_batch(&copy_sql)
            .map_err(|e| Error::warehouse(format!("Failed to export JSON: {e}")))?;

        let json_content = std::fs::read_to_string(&temp_file)
            .map_err(|e| Error::warehouse(format!("Failed to read JSON file: {e}")))?;
        let _ = std::fs::remove_file(&temp_file);

        if json_content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&json_content)
            .map_err(|e| Error::warehouse(format!("Failed to parse JSON: {e}")))
    }
}

/// Exact id match; ids are compared as text so numeric and textual source
/// ids behave alike
fn exact_id(column: &str, value: &str) -> String {
    format!("CAST({column} AS VARCHAR) = '{}'", escape(value))
}

/// Case-insensitive substring match
fn substring(column: &str, value: &str) -> String {
    format!("{column} ILIKE '%{}%'", escape(value))
}

/// Escape a string literal for SQL by doubling single quotes
fn escape(text: &str) -> String {
    text.replace('\'', "''")
}

/// Generate a unique temp-file token (timestamp + pid)
fn temp_token() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{timestamp:x}_{}", std::process::id())
}
