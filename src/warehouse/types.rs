//! Query filter and result types for the warehouse layer

use serde::{Deserialize, Serialize};

/// Filters for listing users. All optional; omitted filters match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    /// Exact match on user id
    pub user_id: Option<String>,
    /// Case-insensitive substring match
    pub first_name: Option<String>,
    /// Case-insensitive substring match
    pub last_name: Option<String>,
    /// Case-insensitive substring match
    pub email: Option<String>,
}

/// Filters for listing chargers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChargerFilter {
    /// Exact match on charger id
    pub charger_id: Option<String>,
    /// Case-insensitive substring match
    pub city: Option<String>,
}

/// Filters for the extended transactions listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub min_kwh: Option<f64>,
    pub max_kwh: Option<f64>,
    pub min_amount_charged: Option<f64>,
    pub max_amount_charged: Option<f64>,
    pub user_id: Option<String>,
    pub charger_id: Option<String>,
    /// Inclusive lower bound on `start_time`, canonical timestamp format
    pub start_datetime: Option<String>,
    /// Inclusive upper bound on `end_time`, canonical timestamp format
    pub end_datetime: Option<String>,
}

/// Filters for per-charger usage analytics
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsFilter {
    pub start_datetime: Option<String>,
    pub end_datetime: Option<String>,
    /// Exact match on transaction status
    pub status: Option<String>,
}

/// Aggregate usage figures for one charger.
///
/// The numeric aggregates are null when no transaction matches the filters;
/// `total_transactions` is zero in that case.
#[derive(Debug, Clone, Serialize)]
pub struct UsageAnalytics {
    pub charger_id: String,
    pub total_transactions: i64,
    pub total_kwh: Option<f64>,
    pub biggest_transaction_kwh: Option<f64>,
    pub smallest_transaction_kwh: Option<f64>,
    pub average_transaction_kwh: Option<f64>,
    pub median_transaction_kwh: Option<f64>,
}
