//! End-to-end cleaning pipeline
//!
//! Orchestrates one entity's run: extract, shape into a table, clean, gate on
//! primary-key uniqueness, and write the CSV artifact. Each run reads the
//! sources fresh and derives everything from them, so re-running over the
//! same inputs yields byte-identical artifacts.

use crate::clean;
use crate::entity::Entity;
use crate::error::Result;
use crate::extract;
use crate::table::Table;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Summary of a single entity's run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub table: String,
    pub rows_extracted: usize,
    pub duplicates_removed: usize,
    pub invalid_coordinates_removed: usize,
    pub outliers_removed: usize,
    pub rows_written: usize,
    pub output_path: PathBuf,
}

/// Drives extraction, cleaning, and CSV output for the configured directories
#[derive(Debug, Clone)]
pub struct Pipeline {
    source_dir: PathBuf,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Where the CSV artifact for an entity lands
    pub fn output_path(&self, entity: Entity) -> PathBuf {
        self.output_dir.join(format!("{}.csv", entity.table_name()))
    }

    /// Run the full pipeline for one entity.
    ///
    /// Fails without writing anything when extraction fails or the cleaned
    /// table violates primary-key uniqueness.
    pub fn run(&self, entity: Entity) -> Result<PipelineReport> {
        tracing::info!("Processing {} table", entity.table_name());

        let records = extract::extract(&self.source_dir, entity)?;
        let rows_extracted = records.len();
        let mut table = Table::from_records(entity.projection(), &records);

        if entity == Entity::Users {
            clean::decompose_names(&mut table)?;
        }
        clean::canonicalize_timestamps(&mut table);
        let duplicates_removed = clean::remove_duplicates(&mut table);
        clean::validate_unique_primary_ids(&table, entity.table_name(), entity.primary_key())?;

        let mut invalid_coordinates_removed = 0;
        let mut outliers_removed = 0;
        if entity == Entity::Chargers {
            clean::canonicalize_cities(&mut table);
            invalid_coordinates_removed = clean::filter_bounds(&mut table);
            outliers_removed = clean::filter_outliers(&mut table);
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_path(entity);
        table.write_csv(&output_path)?;
        tracing::info!("Cleaned CSV file saved to: {}", output_path.display());

        Ok(PipelineReport {
            table: entity.table_name().to_string(),
            rows_extracted,
            duplicates_removed,
            invalid_coordinates_removed,
            outliers_removed,
            rows_written: table.len(),
            output_path,
        })
    }

    /// Run every entity, isolating failures: one table failing never stops
    /// the others.
    pub fn run_all(&self) -> Vec<(Entity, Result<PipelineReport>)> {
        Entity::ALL
            .into_iter()
            .map(|entity| (entity, self.run(entity)))
            .collect()
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
