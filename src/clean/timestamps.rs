//! Timestamp canonicalization
//!
//! Every timestamp column is normalized to UTC wall-clock time rendered as
//! `YYYY-MM-DD HH:MM:SS`. Offsets are applied, then discarded; unparsable
//! values become null rather than errors.

use crate::table::{Field, Table};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Columns normalized wherever they appear in a table
pub const TIMESTAMP_COLUMNS: &[&str] = &["start_time", "end_time", "created_at", "installed_at"];

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Canonicalize every timestamp column present in the table.
/// Returns the number of columns transformed.
pub fn canonicalize_timestamps(table: &mut Table) -> usize {
    let mut transformed = 0;
    for column in TIMESTAMP_COLUMNS {
        if !table.has_column(column) {
            continue;
        }
        table.map_column(column, |cell| match cell {
            Field::Str(text) => match parse_datetime(&text) {
                Some(dt) => Field::Str(dt.format(OUTPUT_FORMAT).to_string()),
                None => Field::Null,
            },
            // Non-string values cannot carry a date-time here; coerce to null
            _ => Field::Null,
        });
        transformed += 1;
        tracing::info!(
            "Transformed timestamps in column '{column}' to 'YYYY-MM-DD HH:MM:SS' (UTC)"
        );
    }
    transformed
}

/// Parse the accepted input shapes into a UTC-naive datetime:
/// RFC 3339 (offset applied then dropped), naive datetimes with `T` or space
/// separators, and bare dates at midnight.
fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}
