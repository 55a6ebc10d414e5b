// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # voltflow
//!
//! Batch pipeline that turns raw EV-charging JSON extracts (users, chargers,
//! transactions, payments) into clean tabular CSV datasets, loads them into an
//! embedded DuckDB warehouse, and serves filtered lookups over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! users.json ───────┐
//! chargers.json ────┼─► Extractor ─► flat records ─► Cleaning ─► <table>.csv
//! transactions.json ┤    (projection,                (names, timestamps,  │
//! payments.json ────┘     join, repair)               dedup, PK gate, geo)│
//!                                                                         ▼
//!                                       S3 upload ◄── artifact ──► DuckDB load
//!                                                                         │
//!                                                    HTTP query API ◄─────┘
//!                                              (/users /chargers /transactions)
//! ```
//!
//! Each entity runs independently: one entity is fully extracted, cleaned, and
//! written before control returns. A hard failure (missing file, malformed
//! JSON, duplicate primary keys) aborts that entity's run and writes nothing;
//! the other entities in a batch are unaffected.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

/// Error types for the pipeline
pub mod error;

/// Entity catalog: projection schemas, primary keys, source files
pub mod entity;

/// In-flight tabular data model and CSV serialization
pub mod table;

/// Record extraction and reconciliation from raw JSON
pub mod extract;

/// Cleaning and validation stages
pub mod clean;

/// Per-entity pipeline orchestration
pub mod pipeline;

/// Output artifact upload (S3 or local object store)
pub mod output;

/// DuckDB warehouse: CSV load and read queries
pub mod warehouse;

/// HTTP query API
pub mod server;

/// Runtime configuration
pub mod config;

/// Command-line interface
pub mod cli;

pub use config::{Config, StorageConfig};
pub use entity::Entity;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
