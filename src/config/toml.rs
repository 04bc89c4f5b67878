//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use crate::network::NetworkConfig;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Resource audit configuration
    #[serde(default)]
    pub audit: AuditSection,

    /// Simulation configuration
    #[serde(default)]
    pub simulation: SimulationSection,

    /// Interface configurations, one `[[interface]]` table each
    #[serde(default, rename = "interface")]
    pub interfaces: Vec<NetworkConfig>,
}

/// Resource audit configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditSection {
    /// Minimum free heap in bytes
    pub min_free_heap_bytes: Option<u64>,

    /// Minimum free stack in bytes
    pub min_free_stack_bytes: Option<u64>,

    /// Log every audit check (default: true)
    pub diagnostics: Option<bool>,
}

/// Simulation configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    /// Backend latency in milliseconds
    pub latency_ms: Option<u64>,

    /// Up/down cycles per interface
    pub cycles: Option<u32>,

    /// Number of simulated devices
    pub devices: Option<u32>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# radionet configuration file

[audit]
# Minimum free heap in bytes for a clean audit (default: 5120)
# min_free_heap_bytes = 5120

# Minimum free stack in bytes for a clean audit (default: 1024)
# min_free_stack_bytes = 1024

# Log every audit check (default: true)
# diagnostics = true

[simulation]
# Simulated backend latency in milliseconds (default: 50)
latency_ms = 50

# Up/down cycles per interface (default: 1)
# cycles = 1

# Number of simulated devices (default: 1)
# devices = 1

# One [[interface]] table per network type: ble, cell, wifi or gnss.
# Leave version at 0 unless you set a field marked "since version N".

[[interface]]
type = "wifi"
version = 0
ssid = "home"
# authentication = "wpa-psk"    # "open" (default) or "wpa-psk"
# passphrase = "secret"
# host_name = "sensor-1"        # since version 1
# connect_timeout_seconds = 20  # since version 1

[[interface]]
type = "gnss"
version = 0
# module = "m9"                 # "m8" (default), "m9" or "m10"
# pin_power = 12
# pin_data_ready = 13
# dynamic_model = "automotive"  # since version 1

# [[interface]]
# type = "cell"
# version = 0
# apn = "internet"
# sim_pin = "1234"
# timeout_seconds = 180
# authentication = "chap"       # since version 1: "none", "pap", "chap" or "automatic"
# username = "user"             # since version 1
# password = "pass"             # since version 1
# mcc_mnc = "26201"             # since version 2

# [[interface]]
# type = "ble"
# version = 0
# role = "peripheral"           # "central", "peripheral" or "central-and-peripheral"
# sps_server = false
# device_name = "tracker"       # since version 1
"#
    .to_string()
}
