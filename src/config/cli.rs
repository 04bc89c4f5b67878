//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// radionet: network interface lifecycle simulator
///
/// Validates versioned interface configurations and drives them through
/// simulated backends, auditing resource symmetry afterwards.
#[derive(Debug, Parser)]
#[command(name = "radionet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: simulate)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Simulated backend latency in milliseconds
    #[arg(long = "latency-ms", global = true)]
    pub latency_ms: Option<u64>,

    /// Number of up/down cycles per interface
    #[arg(long, global = true)]
    pub cycles: Option<u32>,

    /// Number of simulated devices
    #[arg(long, global = true)]
    pub devices: Option<u32>,

    /// Minimum free heap in bytes for a clean audit
    #[arg(long = "min-free-heap", global = true)]
    pub min_free_heap: Option<u64>,

    /// Minimum free stack in bytes for a clean audit
    #[arg(long = "min-free-stack", global = true)]
    pub min_free_stack: Option<u64>,

    /// Do not log each audit check
    #[arg(long = "quiet-audit", global = true)]
    pub quiet_audit: bool,

    /// Print the final audit report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for radionet
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "radionet.toml")]
        output: PathBuf,
    },

    /// Validate the configuration and print each interface's parameters
    Check,

    /// Bring every configured interface up and down, then audit resources
    Simulate,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// Returns true if this is the check command.
    #[must_use]
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Some(Command::Check))
    }
}
