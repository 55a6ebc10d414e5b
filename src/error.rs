//! Error types for voltflow
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for voltflow
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown table name: {table}")]
    UnknownTable { table: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // I/O and Parse Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source file not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Data Integrity Errors
    // ============================================================================
    #[error("Duplicate primary IDs found in {table} table: {duplicates} duplicates")]
    Integrity { table: String, duplicates: usize },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Warehouse Errors
    // ============================================================================
    #[error("Warehouse error: {message}")]
    Warehouse { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown-table error
    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self::UnknownTable {
            table: table.into(),
        }
    }

    /// Create a file-not-found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an integrity violation
    pub fn integrity(table: impl Into<String>, duplicates: usize) -> Self {
        Self::Integrity {
            table: table.into(),
            duplicates,
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a warehouse error
    pub fn warehouse(message: impl Into<String>) -> Self {
        Self::Warehouse {
            message: message.into(),
        }
    }

    /// Check if this error is a data-integrity violation
    pub fn is_integrity(&self) -> bool {
        matches!(self, Error::Integrity { .. })
    }
}

/// Result type alias for voltflow
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::unknown_table("sessions");
        assert_eq!(err.to_string(), "Unknown table name: sessions");

        let err = Error::integrity("users", 3);
        assert_eq!(
            err.to_string(),
            "Duplicate primary IDs found in users table: 3 duplicates"
        );
    }

    #[test]
    fn test_is_integrity() {
        assert!(Error::integrity("chargers", 1).is_integrity());
        assert!(!Error::config("test").is_integrity());
        assert!(!Error::file_not_found("users.json").is_integrity());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
