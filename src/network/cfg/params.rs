//! Fully-populated backend parameters produced by the configuration adapter.
//!
//! Unlike the caller-facing schemas, nothing here is optional-because-older:
//! every versioned field has been read or defaulted already.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::network::NetworkType;

use super::{BleRole, CellAuth, DynamicModel, GnssModule};

/// Wi-Fi security, with the passphrase only where it means something.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum WifiSecurity {
    /// Open network.
    Open,
    /// WPA personal.
    WpaPsk {
        /// The passphrase.
        #[serde(skip_serializing)]
        passphrase: String,
    },
}

impl fmt::Debug for WifiSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::WpaPsk { .. } => write!(f, "WpaPsk {{ passphrase: <redacted> }}"),
        }
    }
}

/// Parameters for the Wi-Fi backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiParams {
    /// Access point SSID.
    pub ssid: String,
    /// Security settings.
    pub security: WifiSecurity,
    /// DHCP host name, if any.
    pub host_name: Option<String>,
    /// Association timeout.
    pub connect_timeout: Duration,
}

/// APN credentials for an authenticated PDP context.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CellCredentials {
    /// Authentication mode; never [`CellAuth::None`].
    pub mode: CellAuth,
    /// User name.
    pub username: String,
    /// Password.
    #[serde(skip_serializing)]
    pub password: String,
}

impl fmt::Debug for CellCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellCredentials")
            .field("mode", &self.mode)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Network selection for the cellular backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum NetworkSelection {
    /// Let the module choose.
    Automatic,
    /// Register with one network only.
    Manual {
        /// MCC followed by MNC.
        mcc_mnc: String,
    },
}

/// Parameters for the cellular backend.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CellParams {
    /// SIM PIN, if any.
    #[serde(skip_serializing)]
    pub sim_pin: Option<String>,
    /// APN; `None` uses the module's database.
    pub apn: Option<String>,
    /// Registration timeout.
    pub timeout: Duration,
    /// APN credentials, if authentication is used.
    pub credentials: Option<CellCredentials>,
    /// Network selection.
    pub selection: NetworkSelection,
}

impl fmt::Debug for CellParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellParams")
            .field("sim_pin", &self.sim_pin.as_ref().map(|_| "<redacted>"))
            .field("apn", &self.apn)
            .field("timeout", &self.timeout)
            .field("credentials", &self.credentials)
            .field("selection", &self.selection)
            .finish()
    }
}

/// Parameters for the BLE backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BleParams {
    /// Role of the module.
    pub role: BleRole,
    /// Start the serial port service server.
    pub sps_server: bool,
    /// Advertised device name, if any.
    pub device_name: Option<String>,
}

/// Parameters for the GNSS backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GnssParams {
    /// GNSS chip generation.
    pub module: GnssModule,
    /// Power pin, if any.
    pub pin_power: Option<u8>,
    /// Data-ready pin, if any.
    pub pin_data_ready: Option<u8>,
    /// Dynamic platform model.
    pub dynamic_model: DynamicModel,
}

/// Backend parameters, one variant per network type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendParams {
    /// BLE parameters.
    Ble(BleParams),
    /// Cellular parameters.
    Cell(CellParams),
    /// Wi-Fi parameters.
    Wifi(WifiParams),
    /// GNSS parameters.
    Gnss(GnssParams),
}

impl BackendParams {
    /// Returns the network type these parameters belong to.
    #[must_use]
    pub const fn network_type(&self) -> NetworkType {
        match self {
            Self::Ble(_) => NetworkType::Ble,
            Self::Cell(_) => NetworkType::Cell,
            Self::Wifi(_) => NetworkType::Wifi,
            Self::Gnss(_) => NetworkType::Gnss,
        }
    }
}

impl fmt::Display for BackendParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wifi(p) => {
                let security = match p.security {
                    WifiSecurity::Open => "open",
                    WifiSecurity::WpaPsk { .. } => "wpa-psk",
                };
                write!(
                    f,
                    "Wi-Fi {{ ssid: {}, security: {security}, timeout: {}s }}",
                    p.ssid,
                    p.connect_timeout.as_secs()
                )
            }
            Self::Cell(p) => write!(
                f,
                "cellular {{ apn: {}, timeout: {}s, auth: {}, selection: {} }}",
                p.apn.as_deref().unwrap_or("<database>"),
                p.timeout.as_secs(),
                p.credentials.is_some(),
                match &p.selection {
                    NetworkSelection::Automatic => "automatic",
                    NetworkSelection::Manual { mcc_mnc } => mcc_mnc.as_str(),
                }
            ),
            Self::Ble(p) => write!(
                f,
                "BLE {{ role: {:?}, sps_server: {} }}",
                p.role, p.sps_server
            ),
            Self::Gnss(p) => write!(
                f,
                "GNSS {{ module: {:?}, dynamic_model: {:?} }}",
                p.module, p.dynamic_model
            ),
        }
    }
}
