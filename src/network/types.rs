//! Core network types for interface representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NetworkError;

/// Network type of an interface.
///
/// Used both as the tag on configuration payloads and as the dispatch key
/// into the backend registry. The set is closed: [`NetworkType::COUNT`] is the
/// number of variants including [`NetworkType::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// No network. Never a valid dispatch key.
    None,
    /// Bluetooth Low Energy.
    Ble,
    /// Cellular (LTE-M, NB-IoT, 2G/3G/4G).
    Cell,
    /// Wi-Fi station.
    Wifi,
    /// GNSS receiver.
    Gnss,
}

impl NetworkType {
    /// Number of network types, including [`NetworkType::None`].
    pub const COUNT: usize = 5;

    /// Every type that can carry an interface, in registry order.
    pub const DISPATCHABLE: [Self; 4] = [Self::Ble, Self::Cell, Self::Wifi, Self::Gnss];

    /// Converts a raw integer tag into a network type.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidType`] for values outside `0..COUNT`.
    pub fn from_raw(raw: i32) -> Result<Self, NetworkError> {
        match raw {
            0 => Ok(Self::None),
            1 => Ok(Self::Ble),
            2 => Ok(Self::Cell),
            3 => Ok(Self::Wifi),
            4 => Ok(Self::Gnss),
            _ => Err(NetworkError::InvalidType(raw)),
        }
    }

    /// Returns the raw integer tag of this type.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Ble => 1,
            Self::Cell => 2,
            Self::Wifi => 3,
            Self::Gnss => 4,
        }
    }

    /// Returns true if interfaces of this type can be dispatched to a backend.
    #[must_use]
    pub const fn is_dispatchable(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Fails fast unless this type can be dispatched to a backend.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidType`] for [`NetworkType::None`].
    pub fn ensure_dispatchable(self) -> Result<Self, NetworkError> {
        if self.is_dispatchable() {
            Ok(self)
        } else {
            Err(NetworkError::InvalidType(self.as_raw()))
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Ble => write!(f, "BLE"),
            Self::Cell => write!(f, "cellular"),
            Self::Wifi => write!(f, "Wi-Fi"),
            Self::Gnss => write!(f, "GNSS"),
        }
    }
}

/// Opaque handle of a physically open device.
///
/// Owned and lifecycle-managed by the device layer; this crate only attaches
/// interface state to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceHandle(u32);

impl DeviceHandle {
    /// Wraps a raw handle value issued by the device layer.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dev#{}", self.0)
    }
}

/// Lifecycle state of one interface on one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterfaceState {
    /// Not connected. The initial state.
    #[default]
    Down,
    /// Connected through its backend.
    Up,
}

impl InterfaceState {
    /// Returns true if the interface is up.
    #[must_use]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

impl fmt::Display for InterfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => write!(f, "down"),
            Self::Up => write!(f, "up"),
        }
    }
}

/// Natural key of an interface: one device, one network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceKey {
    /// The device the interface lives on.
    pub handle: DeviceHandle,
    /// The network type of the interface.
    pub network_type: NetworkType,
}

impl InterfaceKey {
    /// Creates a new interface key.
    #[must_use]
    pub const fn new(handle: DeviceHandle, network_type: NetworkType) -> Self {
        Self {
            handle,
            network_type,
        }
    }
}

impl fmt::Display for InterfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.handle, self.network_type)
    }
}
