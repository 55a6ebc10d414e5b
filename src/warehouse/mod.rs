//! Warehouse loading and query layer
//!
//! Cleaned CSV artifacts are loaded into DuckDB tables named after their
//! entities. The engine answers the filtered-listing and analytics queries
//! the HTTP layer exposes.

mod engine;
mod types;

pub use engine::WarehouseEngine;
pub use types::{AnalyticsFilter, ChargerFilter, TransactionFilter, UsageAnalytics, UserFilter};
