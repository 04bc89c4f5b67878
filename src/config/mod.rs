//! Configuration layer for radionet.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Interfaces are TOML-only: each `[[interface]]` table is run through the
//! configuration adapter at load time, so a bad entry fails before any
//! backend is touched.
//!
//! # Boolean Flag Semantics
//!
//! `--quiet-audit` only disables: it wins over `audit.diagnostics = true`,
//! but cannot turn diagnostics on.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{AuditSection, SimulationSection, TomlConfig, default_config_template};
pub use validated::{InterfacePlan, ValidatedConfig, write_default_config};
