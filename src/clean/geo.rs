//! Charger geospatial cleaning
//!
//! City names are folded to canonical spellings via a lookup table, rows with
//! out-of-range or non-numeric coordinates are dropped, and the survivors go
//! through a single-pass population z-score filter on both axes.

use crate::table::{Field, Table};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Rows whose coordinate z-score exceeds this on either axis are outliers
const Z_THRESHOLD: f64 = 2.0;

static CITY_CORRECTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Zuerich", "Zurich"),
        ("Zürich", "Zurich"),
        ("Sankt Gallen", "St. Gallen"),
    ])
});

/// Fold known city misspellings to their canonical form.
/// Returns the number of cells corrected; unknown spellings pass through.
pub fn canonicalize_cities(table: &mut Table) -> usize {
    let mut corrected = 0;
    table.map_column("city", |cell| match cell {
        Field::Str(city) => match CITY_CORRECTIONS.get(city.as_str()) {
            Some(canonical) => {
                corrected += 1;
                Field::Str((*canonical).to_string())
            }
            None => Field::Str(city),
        },
        other => other,
    });
    if corrected > 0 {
        tracing::info!("Canonicalized {corrected} city names");
    }
    corrected
}

/// Drop rows whose coordinates are non-numeric or outside the valid
/// latitude/longitude ranges. Returns the number of rows removed.
pub fn filter_bounds(table: &mut Table) -> usize {
    let Some(lat_idx) = table.column_index("location_lat") else {
        return 0;
    };
    let Some(lon_idx) = table.column_index("location_lon") else {
        return 0;
    };

    let removed = table.retain_rows(|row| {
        let lat = row[lat_idx].as_f64();
        let lon = row[lon_idx].as_f64();
        matches!((lat, lon), (Some(lat), Some(lon))
            if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon))
    });
    if removed > 0 {
        tracing::info!("Removed {removed} rows with invalid coordinates");
    }
    removed
}

/// Drop coordinate outliers by population z-score.
///
/// Scores are computed once over the rows as they stand when the filter runs
/// and are not recomputed after removals. Returns the number of rows removed.
pub fn filter_outliers(table: &mut Table) -> usize {
    let Some(lat_idx) = table.column_index("location_lat") else {
        return 0;
    };
    let Some(lon_idx) = table.column_index("location_lon") else {
        return 0;
    };

    let lats: Vec<f64> = table
        .rows()
        .iter()
        .map(|row| row[lat_idx].as_f64().unwrap_or(f64::NAN))
        .collect();
    let lons: Vec<f64> = table
        .rows()
        .iter()
        .map(|row| row[lon_idx].as_f64().unwrap_or(f64::NAN))
        .collect();

    let lat_scores = population_zscores(&lats);
    let lon_scores = population_zscores(&lons);

    let mut index = 0;
    let removed = table.retain_rows(|_| {
        let keep = lat_scores[index].abs() <= Z_THRESHOLD && lon_scores[index].abs() <= Z_THRESHOLD;
        index += 1;
        keep
    });
    if removed > 0 {
        tracing::info!("Removed {removed} coordinate outliers (|z| > {Z_THRESHOLD})");
    }
    removed
}

/// Population z-scores for a series. A constant or empty series scores all
/// zeros so no row is flagged.
fn population_zscores(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / stddev).collect()
}
