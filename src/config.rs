//! Configuration loading
//!
//! Runs are configured through a YAML file plus CLI overrides. Storage
//! credentials live here; nothing is pulled from the process environment.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for pipeline runs and the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the raw JSON source files
    pub source_dir: PathBuf,
    /// Where cleaned CSV artifacts land; defaults to the source directory
    pub output_dir: Option<PathBuf>,
    /// Upload destination URL (`s3://bucket/path/` or a local path)
    pub destination: Option<String>,
    /// Credentials for cloud destinations
    pub storage: StorageConfig,
    /// File-backed warehouse path; in-memory when unset
    pub warehouse_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("resources"),
            output_dir: None,
            destination: None,
            storage: StorageConfig::default(),
            warehouse_path: None,
        }
    }
}

/// Object storage credentials, passed to the store builder explicitly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2)
    pub endpoint: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&text)?;
        Ok(config)
    }

    /// Effective output directory
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.source_dir)
    }
}
