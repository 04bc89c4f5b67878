//! Error types for the network lifecycle layer.

use thiserror::Error;

use super::{ConfigVersion, DeviceHandle, NetworkType};

/// Error reported by a transport backend.
///
/// Opaque to the lifecycle layer: it is passed through to the caller
/// unchanged inside [`NetworkError::BackendFailure`]. Any timeout handling
/// lives inside the backend and surfaces here as [`BackendError::Timeout`].
#[derive(Debug, Error)]
pub enum BackendError {
    /// The module did not answer within the backend's own deadline.
    #[error("Backend timed out")]
    Timeout,

    /// The module or network refused the operation.
    #[error("Rejected: {reason}")]
    Rejected {
        /// Reason reported by the module or network.
        reason: String,
    },

    /// The underlying transport (UART, I2C, SPI, driver) failed.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Creates a `Rejected` error.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Error type for every public network lifecycle operation.
///
/// Describes what went wrong without dictating recovery strategy.
/// Idempotent short-circuits (already up, already down) and default
/// substitution for unpopulated versioned fields are not errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The network API was used before `init` or after `deinit`.
    #[error("Network API not initialized")]
    NotInitialized,

    /// The device handle is not open in the device layer.
    #[error("Unknown device {0}")]
    UnknownDevice(DeviceHandle),

    /// The raw network type is `None` or out of range.
    #[error("Invalid network type {0}")]
    InvalidType(i32),

    /// No backend is compiled in for this network type.
    #[error("No {0} backend is available")]
    NotImplemented(NetworkType),

    /// The configuration is tagged with a different type than the operation.
    #[error("Configuration for {actual} applied to a {expected} interface")]
    TypeMismatch {
        /// Type of the operation.
        expected: NetworkType,
        /// Type carried by the configuration.
        actual: NetworkType,
    },

    /// The configuration version is newer than this layer understands.
    #[error("Unsupported {network_type} configuration version {version} (newest is {max})")]
    UnsupportedVersion {
        /// Type of the configuration.
        network_type: NetworkType,
        /// Version carried by the configuration.
        version: ConfigVersion,
        /// Newest version this layer can interpret.
        max: ConfigVersion,
    },

    /// A field required by the configuration is absent.
    #[error("Missing required {network_type} field: {field}")]
    MissingRequiredField {
        /// Type of the configuration.
        network_type: NetworkType,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A configuration field is present but malformed.
    #[error("Invalid {network_type} field {field}: {reason}")]
    InvalidField {
        /// Type of the configuration.
        network_type: NetworkType,
        /// Name of the invalid field.
        field: &'static str,
        /// Reason for invalidity.
        reason: String,
    },

    /// The transport backend failed.
    #[error("{network_type} backend failed: {source}")]
    BackendFailure {
        /// Type of the backend that failed.
        network_type: NetworkType,
        /// Error reported by the backend.
        #[source]
        source: BackendError,
    },
}

impl NetworkError {
    /// Creates a `MissingRequiredField` error.
    #[must_use]
    pub const fn missing(network_type: NetworkType, field: &'static str) -> Self {
        Self::MissingRequiredField {
            network_type,
            field,
        }
    }

    /// Creates an `InvalidField` error.
    #[must_use]
    pub fn invalid(network_type: NetworkType, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            network_type,
            field,
            reason: reason.into(),
        }
    }

    /// Wraps a backend error for the given network type.
    #[must_use]
    pub const fn backend(network_type: NetworkType, source: BackendError) -> Self {
        Self::BackendFailure {
            network_type,
            source,
        }
    }

    /// Returns true if the error came from a transport backend.
    #[must_use]
    pub const fn is_backend_failure(&self) -> bool {
        matches!(self, Self::BackendFailure { .. })
    }
}

/// Well-known field names for `MissingRequiredField` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The whole configuration (first `up` without one).
    pub const CONFIGURATION: &str = "configuration";
    /// Wi-Fi SSID.
    pub const SSID: &str = "ssid";
    /// Wi-Fi passphrase.
    pub const PASSPHRASE: &str = "passphrase";
    /// Wi-Fi connect timeout.
    pub const CONNECT_TIMEOUT: &str = "connect_timeout_seconds";
    /// Cellular SIM PIN.
    pub const SIM_PIN: &str = "sim_pin";
    /// Cellular APN user name.
    pub const USERNAME: &str = "username";
    /// Cellular APN password.
    pub const PASSWORD: &str = "password";
    /// Cellular manual network selection.
    pub const MCC_MNC: &str = "mcc_mnc";
    /// BLE device name.
    pub const DEVICE_NAME: &str = "device_name";
}
