//! Cleaning and validation stages
//!
//! The stages run in a fixed order on the whole in-flight table:
//!
//! 1. name decomposition (users only)
//! 2. timestamp canonicalization
//! 3. exact duplicate-row removal
//! 4. primary-key uniqueness gate (hard failure)
//! 5. charger geospatial cleaning: city canonicalization, coordinate bounds,
//!    single-pass z-score outlier removal
//!
//! Stages that drop or repair rows report counts; only the primary-key gate
//! can fail the run.

mod geo;
mod names;
mod timestamps;
mod validate;

pub use geo::{canonicalize_cities, filter_bounds, filter_outliers};
pub use names::decompose_names;
pub use timestamps::{canonicalize_timestamps, TIMESTAMP_COLUMNS};
pub use validate::{remove_duplicates, validate_unique_primary_ids};

#[cfg(test)]
mod tests;
