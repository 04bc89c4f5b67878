//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::network::cfg;
use crate::network::{BackendParams, NetworkConfig, NetworkType};
use crate::resource::AuditThresholds;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// One configured interface, with the parameters the adapter resolved for it.
#[derive(Debug, Clone)]
pub struct InterfacePlan {
    /// The configuration as written.
    pub config: NetworkConfig,
    /// The parameters its backend will receive.
    pub params: BackendParams,
}

impl InterfacePlan {
    /// Returns the interface's network type.
    #[must_use]
    pub const fn network_type(&self) -> NetworkType {
        self.config.network_type()
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Audit thresholds
    pub thresholds: AuditThresholds,

    /// Whether each audit check is logged
    pub diagnostics: bool,

    /// Simulated backend latency
    pub latency: Duration,

    /// Up/down cycles per interface
    pub cycles: u32,

    /// Number of simulated devices
    pub devices: u32,

    /// Configured interfaces, at most one per network type
    pub interfaces: Vec<InterfacePlan>,

    /// Print the final audit report as JSON
    pub json: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<String> = self
            .interfaces
            .iter()
            .map(|plan| plan.network_type().to_string())
            .collect();

        write!(
            f,
            "Config {{ interfaces: [{}], devices: {}, cycles: {}, latency: {}ms, \
             min_free_heap: {}B, min_free_stack: {}B }}",
            types.join(", "),
            self.devices,
            self.cycles,
            self.latency.as_millis(),
            self.thresholds.min_free_heap_bytes,
            self.thresholds.min_free_stack_bytes,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An `[[interface]]` entry is rejected by the configuration adapter
    /// - Two entries share a network type
    /// - Latency, cycles or devices are zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let interfaces = Self::resolve_interfaces(toml)?;
        let latency = Self::resolve_latency(cli, toml)?;

        let simulation = toml.map(|t| &t.simulation);
        let cycles = positive(
            field::CYCLES,
            cli.cycles
                .or_else(|| simulation.and_then(|s| s.cycles))
                .unwrap_or(defaults::CYCLES),
        )?;
        let devices = positive(
            field::DEVICES,
            cli.devices
                .or_else(|| simulation.and_then(|s| s.devices))
                .unwrap_or(defaults::DEVICES),
        )?;

        // Flags only disable; TOML decides otherwise
        let diagnostics = !cli.quiet_audit
            && toml
                .and_then(|t| t.audit.diagnostics)
                .unwrap_or(defaults::AUDIT_DIAGNOSTICS);

        Ok(Self {
            thresholds: Self::resolve_thresholds(cli, toml),
            diagnostics,
            latency,
            cycles,
            devices,
            interfaces,
            json: cli.json,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns the distinct network types that have an interface configured.
    pub fn network_types(&self) -> impl Iterator<Item = NetworkType> + '_ {
        self.interfaces.iter().map(InterfacePlan::network_type)
    }

    fn resolve_interfaces(toml: Option<&TomlConfig>) -> Result<Vec<InterfacePlan>, ConfigError> {
        let Some(toml) = toml else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        toml.interfaces
            .iter()
            .enumerate()
            .map(|(index, config)| {
                let network_type = config.network_type();
                let params = cfg::resolve(network_type, config)
                    .map_err(|source| ConfigError::InvalidInterface { index, source })?;

                if !seen.insert(network_type) {
                    return Err(ConfigError::DuplicateInterface { network_type });
                }

                Ok(InterfacePlan {
                    config: config.clone(),
                    params,
                })
            })
            .collect()
    }

    fn resolve_latency(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let millis = cli
            .latency_ms
            .or_else(|| toml.and_then(|t| t.simulation.latency_ms))
            .unwrap_or(defaults::LATENCY_MS);

        if millis == 0 {
            return Err(ConfigError::InvalidDuration {
                field: field::LATENCY,
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_millis(millis))
    }

    fn resolve_thresholds(cli: &Cli, toml: Option<&TomlConfig>) -> AuditThresholds {
        let audit = toml.map(|t| &t.audit);
        let fallback = AuditThresholds::default();

        AuditThresholds {
            min_free_heap_bytes: cli
                .min_free_heap
                .or_else(|| audit.and_then(|a| a.min_free_heap_bytes))
                .unwrap_or(fallback.min_free_heap_bytes),
            min_free_stack_bytes: cli
                .min_free_stack
                .or_else(|| audit.and_then(|a| a.min_free_stack_bytes))
                .unwrap_or(fallback.min_free_stack_bytes),
        }
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn positive(field: &'static str, value: u32) -> Result<u32, ConfigError> {
    if value == 0 {
        Err(ConfigError::zero_count(field))
    } else {
        Ok(value)
    }
}
