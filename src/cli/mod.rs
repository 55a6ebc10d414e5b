//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `run` - Extract, clean, and write the tables
//! - `check` - Validate sources, destination, and warehouse connectivity
//! - `serve` - Load the warehouse and start HTTP server mode

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
