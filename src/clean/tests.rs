use super::*;
use crate::error::Error;
use crate::table::{Field, Table};
use pretty_assertions::assert_eq;

fn charger_table(rows: Vec<Vec<Field>>) -> Table {
    let mut table = Table::new(vec![
        "charger_id".to_string(),
        "city".to_string(),
        "location_lat".to_string(),
        "location_lon".to_string(),
        "installed_at".to_string(),
    ]);
    for row in rows {
        table.push_row(row);
    }
    table
}

fn charger_row(id: &str, city: &str, lat: f64, lon: f64) -> Vec<Field> {
    vec![
        Field::Str(id.to_string()),
        Field::Str(city.to_string()),
        Field::Float(lat),
        Field::Float(lon),
        Field::Str("2023-05-01".to_string()),
    ]
}

#[test]
fn test_city_canonicalization_applies_lookup() {
    let mut table = charger_table(vec![
        charger_row("CH-1", "Zuerich", 47.37, 8.54),
        charger_row("CH-2", "Zürich", 47.38, 8.55),
        charger_row("CH-3", "Sankt Gallen", 47.42, 9.37),
        charger_row("CH-4", "Lugano", 46.00, 8.95),
    ]);
    let corrected = canonicalize_cities(&mut table);
    assert_eq!(corrected, 3);
    let cities: Vec<String> = table
        .column_values("city")
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(cities, vec!["Zurich", "Zurich", "St. Gallen", "Lugano"]);
}

#[test]
fn test_bounds_filter_drops_invalid_coordinates() {
    let mut table = charger_table(vec![
        charger_row("CH-1", "Zurich", 47.37, 8.54),
        charger_row("CH-2", "Zurich", 200.0, 8.54),
        charger_row("CH-3", "Zurich", 47.37, -181.0),
    ]);
    table.push_row(vec![
        Field::Str("CH-4".to_string()),
        Field::Str("Zurich".to_string()),
        Field::Null,
        Field::Float(8.54),
        Field::Str("2023-05-01".to_string()),
    ]);

    let removed = filter_bounds(&mut table);
    assert_eq!(removed, 3);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_bounds_filter_accepts_numeric_strings() {
    let mut table = charger_table(vec![]);
    table.push_row(vec![
        Field::Str("CH-1".to_string()),
        Field::Str("Zurich".to_string()),
        Field::Str("47.37".to_string()),
        Field::Str("8.54".to_string()),
        Field::Str("2023-05-01".to_string()),
    ]);
    assert_eq!(filter_bounds(&mut table), 0);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_outlier_filter_drops_only_the_distant_charger() {
    // Ten chargers clustered around Zurich plus one far away. The cluster
    // scores well under the threshold, the stray well over it.
    let mut table = charger_table(
        (0..10)
            .map(|i| {
                charger_row(
                    &format!("CH-{i}"),
                    "Zurich",
                    47.36 + f64::from(i) * 0.01,
                    8.51 + f64::from(i) * 0.01,
                )
            })
            .collect(),
    );
    table.push_row(charger_row("CH-far", "Zurich", 10.0, 100.0));

    let removed = filter_outliers(&mut table);
    assert_eq!(removed, 1);
    assert_eq!(table.len(), 10);
    assert!(table
        .column_values("charger_id")
        .unwrap()
        .iter()
        .all(|id| id.to_string() != "CH-far"));
}

#[test]
fn test_outlier_filter_keeps_identical_coordinates() {
    let mut table = charger_table(
        (0..4)
            .map(|i| charger_row(&format!("CH-{i}"), "Bern", 46.95, 7.44))
            .collect(),
    );
    assert_eq!(filter_outliers(&mut table), 0);
    assert_eq!(table.len(), 4);
}

#[test]
fn test_remove_duplicates_keeps_first_occurrence() {
    let mut table = charger_table(vec![
        charger_row("CH-1", "Zurich", 47.37, 8.54),
        charger_row("CH-1", "Zurich", 47.37, 8.54),
        charger_row("CH-2", "Bern", 46.95, 7.44),
        charger_row("CH-1", "Zurich", 47.37, 8.54),
    ]);
    let removed = remove_duplicates(&mut table);
    assert_eq!(removed, 2);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_near_duplicates_survive() {
    let mut table = charger_table(vec![
        charger_row("CH-1", "Zurich", 47.37, 8.54),
        charger_row("CH-1", "Zurich", 47.3700001, 8.54),
    ]);
    assert_eq!(remove_duplicates(&mut table), 0);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_primary_key_gate_passes_unique_ids() {
    let table = charger_table(vec![
        charger_row("CH-1", "Zurich", 47.37, 8.54),
        charger_row("CH-2", "Bern", 46.95, 7.44),
    ]);
    assert!(validate_unique_primary_ids(&table, "chargers", "charger_id").is_ok());
}

#[test]
fn test_primary_key_gate_counts_repeats() {
    let table = charger_table(vec![
        charger_row("CH-1", "Zurich", 47.37, 8.54),
        charger_row("CH-1", "Bern", 46.95, 7.44),
        charger_row("CH-1", "Basel", 47.56, 7.59),
    ]);
    let err = validate_unique_primary_ids(&table, "chargers", "charger_id").unwrap_err();
    match err {
        Error::Integrity { table, duplicates } => {
            assert_eq!(table, "chargers");
            assert_eq!(duplicates, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_primary_key_gate_rejects_null_ids() {
    let mut table = charger_table(vec![charger_row("CH-1", "Zurich", 47.37, 8.54)]);
    table.push_row(vec![
        Field::Null,
        Field::Str("Bern".to_string()),
        Field::Float(46.95),
        Field::Float(7.44),
        Field::Str("2023-05-01".to_string()),
    ]);
    assert!(validate_unique_primary_ids(&table, "chargers", "charger_id").is_err());
}

#[test]
fn test_timestamp_canonicalization_on_table() {
    let mut table = Table::new(vec!["session_id".to_string(), "start_time".to_string()]);
    table.push_row(vec![
        Field::Str("S-1".to_string()),
        Field::Str("2024-01-05T10:00:00+02:00".to_string()),
    ]);
    table.push_row(vec![
        Field::Str("S-2".to_string()),
        Field::Str("not a date".to_string()),
    ]);

    let transformed = canonicalize_timestamps(&mut table);
    assert_eq!(transformed, 1);
    assert_eq!(
        table.rows()[0][1],
        Field::Str("2024-01-05 08:00:00".to_string())
    );
    assert_eq!(table.rows()[1][1], Field::Null);
}

#[test]
fn test_decompose_names_reshapes_users_table() {
    let mut table = Table::new(vec![
        "user_id".to_string(),
        "name".to_string(),
        "email".to_string(),
        "tier".to_string(),
        "created_at".to_string(),
    ]);
    table.push_row(vec![
        Field::Str("U-1".to_string()),
        Field::Str("Dr. Jane Q. Public Jr.".to_string()),
        Field::Str("jane@example.com".to_string()),
        Field::Str("gold".to_string()),
        Field::Str("2024-01-01 00:00:00".to_string()),
    ]);
    table.push_row(vec![
        Field::Str("U-2".to_string()),
        Field::Null,
        Field::Null,
        Field::Null,
        Field::Null,
    ]);

    decompose_names(&mut table).unwrap();
    assert_eq!(
        table.columns(),
        &[
            "user_id",
            "full_name",
            "first_name",
            "last_name",
            "email",
            "tier",
            "created_at"
        ]
    );
    // Original value preserved verbatim, split parts derived
    assert_eq!(
        table.rows()[0][1],
        Field::Str("Dr. Jane Q. Public Jr.".to_string())
    );
    assert_eq!(table.rows()[0][2], Field::Str("Jane".to_string()));
    assert_eq!(table.rows()[0][3], Field::Str("Q. Public".to_string()));
    assert_eq!(table.rows()[1][2], Field::Null);
    assert_eq!(table.rows()[1][3], Field::Null);
}
