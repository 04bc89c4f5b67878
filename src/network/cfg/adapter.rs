//! Versioned configuration adapter.
//!
//! Turns a caller's [`NetworkConfig`] into the [`BackendParams`] its backend
//! expects. The type tag is checked first, then the schema version, then each
//! field: a field introduced after the base schema is read only when the
//! configuration's version says it is meaningful, otherwise its default is
//! used.

use std::time::Duration;

use crate::network::error::field;
use crate::network::{NetworkError, NetworkType};

use super::params::{
    BackendParams, BleParams, CellCredentials, CellParams, GnssParams, NetworkSelection,
    WifiParams, WifiSecurity,
};
use super::{
    BleConfig, CellAuth, CellConfig, ConfigVersion, GnssConfig, NetworkConfig, WifiAuth,
    WifiConfig, defaults,
};

const V1: ConfigVersion = ConfigVersion::new(1);
const V2: ConfigVersion = ConfigVersion::new(2);

/// Resolves a configuration for an interface of type `expected`.
///
/// # Errors
///
/// Returns:
/// - [`NetworkError::InvalidType`] if `expected` is [`NetworkType::None`]
/// - [`NetworkError::TypeMismatch`] if the configuration is tagged differently
/// - [`NetworkError::UnsupportedVersion`] if the version is newer than known
/// - [`NetworkError::MissingRequiredField`] / [`NetworkError::InvalidField`]
///   for field-level problems
pub fn resolve(expected: NetworkType, config: &NetworkConfig) -> Result<BackendParams, NetworkError> {
    expected.ensure_dispatchable()?;
    check_type(expected, config)?;

    match config {
        NetworkConfig::Wifi(c) => resolve_wifi(c).map(BackendParams::Wifi),
        NetworkConfig::Cell(c) => resolve_cell(c).map(BackendParams::Cell),
        NetworkConfig::Ble(c) => resolve_ble(c).map(BackendParams::Ble),
        NetworkConfig::Gnss(c) => resolve_gnss(c).map(BackendParams::Gnss),
    }
}

/// Checks that a configuration's tag matches the operation's type.
///
/// # Errors
///
/// Returns [`NetworkError::TypeMismatch`] on disagreement.
pub fn check_type(expected: NetworkType, config: &NetworkConfig) -> Result<(), NetworkError> {
    let actual = config.network_type();
    if actual == expected {
        Ok(())
    } else {
        Err(NetworkError::TypeMismatch { expected, actual })
    }
}

/// Reads fields according to a configuration's schema version.
#[derive(Debug, Clone, Copy)]
struct VersionGate {
    network_type: NetworkType,
    version: ConfigVersion,
}

impl VersionGate {
    /// Rejects versions newer than `newest`.
    fn new(
        network_type: NetworkType,
        version: ConfigVersion,
        newest: ConfigVersion,
    ) -> Result<Self, NetworkError> {
        if version > newest {
            return Err(NetworkError::UnsupportedVersion {
                network_type,
                version,
                max: newest,
            });
        }
        Ok(Self {
            network_type,
            version,
        })
    }

    /// Returns a field introduced at `since`, or `None` if the version predates it.
    fn read<T: Clone>(self, since: ConfigVersion, value: Option<&T>) -> Option<T> {
        if self.version.includes(since) {
            value.cloned()
        } else {
            None
        }
    }

    const fn missing(self, field: &'static str) -> NetworkError {
        NetworkError::missing(self.network_type, field)
    }

    fn invalid(self, field: &'static str, reason: impl Into<String>) -> NetworkError {
        NetworkError::invalid(self.network_type, field, reason)
    }
}

fn resolve_wifi(config: &WifiConfig) -> Result<WifiParams, NetworkError> {
    let gate = VersionGate::new(NetworkType::Wifi, config.version, defaults::WIFI_SCHEMA)?;

    let ssid = non_empty(config.ssid.as_deref()).ok_or_else(|| gate.missing(field::SSID))?;

    let security = match config.authentication {
        WifiAuth::Open => WifiSecurity::Open,
        WifiAuth::WpaPsk => {
            let passphrase = non_empty(config.passphrase.as_deref())
                .ok_or_else(|| gate.missing(field::PASSPHRASE))?;
            WifiSecurity::WpaPsk {
                passphrase: passphrase.to_string(),
            }
        }
    };

    let host_name = gate.read(V1, config.host_name.as_ref());

    let connect_timeout = match gate.read(V1, config.connect_timeout_seconds.as_ref()) {
        Some(0) => return Err(gate.invalid(field::CONNECT_TIMEOUT, "must be greater than 0")),
        Some(seconds) => Duration::from_secs(u64::from(seconds)),
        None => defaults::wifi_connect_timeout(),
    };

    Ok(WifiParams {
        ssid: ssid.to_string(),
        security,
        host_name,
        connect_timeout,
    })
}

fn resolve_cell(config: &CellConfig) -> Result<CellParams, NetworkError> {
    let gate = VersionGate::new(NetworkType::Cell, config.version, defaults::CELL_SCHEMA)?;

    let sim_pin = match config.sim_pin.as_deref() {
        Some(pin) if !is_digits(pin, 4..=8) => {
            return Err(gate.invalid(field::SIM_PIN, "must be 4 to 8 digits"));
        }
        pin => pin.map(str::to_string),
    };

    let timeout = match config.timeout_seconds {
        None | Some(0) => defaults::cell_connect_timeout(),
        Some(seconds) => Duration::from_secs(u64::from(seconds)),
    };

    let credentials = match gate
        .read(V1, config.authentication.as_ref())
        .unwrap_or_default()
    {
        CellAuth::None => None,
        mode => {
            let username = gate
                .read(V1, config.username.as_ref())
                .filter(|u| !u.is_empty())
                .ok_or_else(|| gate.missing(field::USERNAME))?;
            let password = gate
                .read(V1, config.password.as_ref())
                .filter(|p| !p.is_empty())
                .ok_or_else(|| gate.missing(field::PASSWORD))?;
            Some(CellCredentials {
                mode,
                username,
                password,
            })
        }
    };

    let selection = match gate.read(V2, config.mcc_mnc.as_ref()) {
        Some(code) if !is_digits(&code, 5..=6) => {
            return Err(gate.invalid(field::MCC_MNC, "must be 5 or 6 digits"));
        }
        Some(mcc_mnc) => NetworkSelection::Manual { mcc_mnc },
        None => NetworkSelection::Automatic,
    };

    Ok(CellParams {
        sim_pin,
        apn: non_empty(config.apn.as_deref()).map(str::to_string),
        timeout,
        credentials,
        selection,
    })
}

fn resolve_ble(config: &BleConfig) -> Result<BleParams, NetworkError> {
    let gate = VersionGate::new(NetworkType::Ble, config.version, defaults::BLE_SCHEMA)?;

    let device_name = gate.read(V1, config.device_name.as_ref());
    if device_name.as_ref().is_some_and(|name| name.len() > 29) {
        return Err(gate.invalid(field::DEVICE_NAME, "must fit in an advertising packet (29 bytes)"));
    }

    Ok(BleParams {
        role: config.role,
        sps_server: config.sps_server,
        device_name,
    })
}

fn resolve_gnss(config: &GnssConfig) -> Result<GnssParams, NetworkError> {
    let gate = VersionGate::new(NetworkType::Gnss, config.version, defaults::GNSS_SCHEMA)?;

    Ok(GnssParams {
        module: config.module,
        pin_power: config.pin_power,
        pin_data_ready: config.pin_data_ready,
        dynamic_model: gate
            .read(V1, config.dynamic_model.as_ref())
            .unwrap_or_default(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn is_digits(value: &str, lengths: std::ops::RangeInclusive<usize>) -> bool {
    lengths.contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}
