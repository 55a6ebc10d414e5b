//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Voltflow charging-data pipeline CLI
#[derive(Parser, Debug)]
#[command(name = "voltflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the raw JSON source files (overrides config)
    #[arg(short, long, global = true)]
    pub source_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract, clean, and write the tables
    Run {
        /// Tables to process (comma-separated, empty = all)
        #[arg(long)]
        tables: Option<String>,

        /// Upload cleaned CSVs to the configured destination
        #[arg(long)]
        upload: bool,

        /// Load cleaned CSVs into the warehouse
        #[arg(long)]
        load: bool,
    },

    /// Validate sources, destination, and warehouse connectivity
    Check,

    /// Load the warehouse and start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}
