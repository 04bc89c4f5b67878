//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default simulated backend latency in milliseconds.
pub const LATENCY_MS: u64 = 50;

/// Default number of up/down cycles per interface.
pub const CYCLES: u32 = 1;

/// Default number of simulated devices.
pub const DEVICES: u32 = 1;

/// Whether audit checks are logged by default.
pub const AUDIT_DIAGNOSTICS: bool = true;

/// Default simulated backend latency as Duration.
#[must_use]
pub const fn latency() -> Duration {
    Duration::from_millis(LATENCY_MS)
}
