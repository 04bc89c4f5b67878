//! Caller-facing versioned configuration structures.
//!
//! Every structure carries a [`ConfigVersion`]. Fields documented with
//! "since version N" are only read when `version >= N`; leave `version` at
//! zero and those fields are ignored and defaulted, which keeps code written
//! against the base schema working unchanged as fields are added.
//!
//! New fields must be appended with a bumped schema version and a documented
//! default. Fields are never removed or reinterpreted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::network::NetworkType;

/// Schema version of a configuration structure.
///
/// Zero is the base schema.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConfigVersion(u32);

impl ConfigVersion {
    /// The base schema.
    pub const BASE: Self = Self(0);

    /// Creates a version tag.
    #[must_use]
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    /// Returns the numeric version.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns true if a field introduced at `since` is meaningful.
    #[must_use]
    pub const fn includes(self, since: Self) -> bool {
        self.0 >= since.0
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network configuration, one variant per network type.
///
/// Serialized tag-first: `{ type = "wifi", version = 0, ssid = "home" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NetworkConfig {
    /// BLE configuration.
    Ble(BleConfig),
    /// Cellular configuration.
    Cell(CellConfig),
    /// Wi-Fi configuration.
    Wifi(WifiConfig),
    /// GNSS configuration.
    Gnss(GnssConfig),
}

impl NetworkConfig {
    /// Returns the network type this configuration is tagged with.
    #[must_use]
    pub const fn network_type(&self) -> NetworkType {
        match self {
            Self::Ble(_) => NetworkType::Ble,
            Self::Cell(_) => NetworkType::Cell,
            Self::Wifi(_) => NetworkType::Wifi,
            Self::Gnss(_) => NetworkType::Gnss,
        }
    }

    /// Returns the schema version this configuration is tagged with.
    #[must_use]
    pub const fn version(&self) -> ConfigVersion {
        match self {
            Self::Ble(c) => c.version,
            Self::Cell(c) => c.version,
            Self::Wifi(c) => c.version,
            Self::Gnss(c) => c.version,
        }
    }
}

impl From<BleConfig> for NetworkConfig {
    fn from(config: BleConfig) -> Self {
        Self::Ble(config)
    }
}

impl From<CellConfig> for NetworkConfig {
    fn from(config: CellConfig) -> Self {
        Self::Cell(config)
    }
}

impl From<WifiConfig> for NetworkConfig {
    fn from(config: WifiConfig) -> Self {
        Self::Wifi(config)
    }
}

impl From<GnssConfig> for NetworkConfig {
    fn from(config: GnssConfig) -> Self {
        Self::Gnss(config)
    }
}

/// Wi-Fi access point authentication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WifiAuth {
    /// No authentication.
    #[default]
    Open,
    /// WPA/WPA2/WPA3 personal; requires a passphrase.
    WpaPsk,
}

/// Wi-Fi station configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    /// Schema version; leave at zero unless setting a newer field.
    pub version: ConfigVersion,
    /// Access point SSID (required).
    pub ssid: Option<String>,
    /// Access point authentication mode.
    pub authentication: WifiAuth,
    /// WPA passphrase; leave unset for an open network.
    pub passphrase: Option<String>,
    /// DHCP host name to announce. Since version 1.
    pub host_name: Option<String>,
    /// Seconds to wait for association. Since version 1; defaults to 20.
    pub connect_timeout_seconds: Option<u32>,
}

/// Cellular PDP context authentication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellAuth {
    /// No APN authentication.
    #[default]
    None,
    /// PAP.
    Pap,
    /// CHAP.
    Chap,
    /// Let the module pick.
    Automatic,
}

/// Cellular configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    /// Schema version; leave at zero unless setting a newer field.
    pub version: ConfigVersion,
    /// SIM PIN, if the SIM is locked.
    pub sim_pin: Option<String>,
    /// APN; unset lets the module look it up from its database.
    pub apn: Option<String>,
    /// Seconds to wait for registration; unset or zero means 180.
    pub timeout_seconds: Option<u32>,
    /// APN user name. Since version 1.
    pub username: Option<String>,
    /// APN password. Since version 1.
    pub password: Option<String>,
    /// APN authentication mode. Since version 1; defaults to none.
    pub authentication: Option<CellAuth>,
    /// Network to register with manually, as MCC followed by MNC.
    /// Since version 2; unset means automatic selection.
    pub mcc_mnc: Option<String>,
}

/// BLE role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BleRole {
    /// Connects to peripherals.
    Central,
    /// Advertises and accepts connections.
    #[default]
    Peripheral,
    /// Both at once.
    CentralAndPeripheral,
}

/// BLE configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BleConfig {
    /// Schema version; leave at zero unless setting a newer field.
    pub version: ConfigVersion,
    /// Role of the module.
    pub role: BleRole,
    /// Start the serial port service server.
    pub sps_server: bool,
    /// Advertised device name. Since version 1.
    pub device_name: Option<String>,
}

/// GNSS chip generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GnssModule {
    /// M8 series.
    #[default]
    M8,
    /// M9 series.
    M9,
    /// M10 series.
    M10,
}

/// GNSS dynamic platform model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicModel {
    /// General purpose.
    #[default]
    Portable,
    /// Not moving.
    Stationary,
    /// Walking speed.
    Pedestrian,
    /// Road vehicle.
    Automotive,
}

/// GNSS configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GnssConfig {
    /// Schema version; leave at zero unless setting a newer field.
    pub version: ConfigVersion,
    /// GNSS chip generation.
    pub module: GnssModule,
    /// Host pin that powers the GNSS chip, if any.
    pub pin_power: Option<u8>,
    /// Host pin wired to the chip's data-ready output, if any.
    pub pin_data_ready: Option<u8>,
    /// Dynamic platform model. Since version 1; defaults to portable.
    pub dynamic_model: Option<DynamicModel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod config_version {
        use super::*;

        #[test]
        fn default_is_base() {
            assert_eq!(ConfigVersion::default(), ConfigVersion::BASE);
        }

        #[test]
        fn includes_fields_at_or_below() {
            let v1 = ConfigVersion::new(1);

            assert!(v1.includes(ConfigVersion::BASE));
            assert!(v1.includes(ConfigVersion::new(1)));
            assert!(!v1.includes(ConfigVersion::new(2)));
        }
    }

    mod network_config {
        use super::*;

        #[test]
        fn tag_follows_variant() {
            let config = NetworkConfig::from(GnssConfig::default());
            assert_eq!(config.network_type(), NetworkType::Gnss);
        }

        #[test]
        fn version_follows_inner_struct() {
            let config = NetworkConfig::from(CellConfig {
                version: ConfigVersion::new(2),
                ..CellConfig::default()
            });
            assert_eq!(config.version(), ConfigVersion::new(2));
        }

        #[test]
        fn deserializes_tag_first_layout() {
            let config: NetworkConfig = serde_json::from_str(
                r#"{"type":"wifi","version":0,"ssid":"home","authentication":"wpa-psk","passphrase":"secret"}"#,
            )
            .unwrap();

            let NetworkConfig::Wifi(wifi) = config else {
                panic!("expected a Wi-Fi config");
            };
            assert_eq!(wifi.ssid.as_deref(), Some("home"));
            assert_eq!(wifi.authentication, WifiAuth::WpaPsk);
        }

        #[test]
        fn missing_version_deserializes_as_base() {
            let config: NetworkConfig = serde_json::from_str(r#"{"type":"ble"}"#).unwrap();
            assert_eq!(config.version(), ConfigVersion::BASE);
        }

        #[test]
        fn unknown_tag_is_rejected() {
            let result = serde_json::from_str::<NetworkConfig>(r#"{"type":"lora"}"#);
            assert!(result.is_err());
        }

        #[test]
        fn serializes_tag_first() {
            let json = serde_json::to_value(NetworkConfig::from(BleConfig::default())).unwrap();
            assert_eq!(json["type"], "ble");
            assert_eq!(json["version"], 0);
        }
    }
}
