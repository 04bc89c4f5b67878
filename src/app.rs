//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use radionet::config::{ConfigError, field};
use radionet::network::NetworkError;
use radionet::resource::AuditReport;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0) - clean audit, or a command that does not audit.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - unreadable file, rejected interface, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - failed simulation or resource violations.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::FileRead { .. } => {
            eprintln!("\nRun 'radionet init' to generate a configuration template.");
        }
        ConfigError::InvalidInterface {
            source: NetworkError::UnsupportedVersion { max, .. },
            ..
        } => {
            eprintln!("\nSet 'version' to {max} or lower for this interface.");
        }
        ConfigError::InvalidDuration { field: f, .. } if *f == field::LATENCY => {
            eprintln!("\nUse a latency of at least 1 millisecond.");
        }
        _ => {}
    }
}

/// Prints an audit report as pretty JSON on stdout.
pub fn print_report_json(report: &AuditReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!("Failed to serialize audit report: {e}"),
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
