//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::network::{NetworkError, NetworkType};

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An `[[interface]]` entry was rejected by the configuration adapter.
    #[error("Invalid interface #{}: {source}", index + 1)]
    InvalidInterface {
        /// Zero-based position of the entry in the file
        index: usize,
        /// Adapter error
        #[source]
        source: NetworkError,
    },

    /// Two `[[interface]]` entries share a network type.
    #[error("Duplicate {network_type} interface: at most one entry per type")]
    DuplicateInterface {
        /// The repeated type
        network_type: NetworkType,
    },

    /// Invalid duration value (zero or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid count value (zero).
    #[error("Invalid count for {field}: {reason}")]
    InvalidCount {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names for validation errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// Simulated backend latency.
    pub const LATENCY: &str = "latency_ms";
    /// Up/down cycles.
    pub const CYCLES: &str = "cycles";
    /// Simulated devices.
    pub const DEVICES: &str = "devices";
}

impl ConfigError {
    /// Creates an `InvalidCount` error for a zero count.
    #[must_use]
    pub fn zero_count(field: &'static str) -> Self {
        Self::InvalidCount {
            field,
            reason: "must be greater than 0".to_string(),
        }
    }
}
