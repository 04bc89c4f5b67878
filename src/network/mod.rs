//! Network interface lifecycle layer.
//!
//! This module provides types and traits for:
//! - Identifying interfaces ([`DeviceHandle`], [`NetworkType`], [`InterfaceKey`])
//! - Versioned configuration and its adapter ([`cfg`])
//! - Per-type transport backends ([`NetworkBackend`], [`BackendRegistry`])
//! - Querying the device layer ([`DeviceDirectory`])
//! - The Down/Up state machine per interface ([`NetworkManager`])

pub mod backend;
pub mod cfg;
mod device;
mod error;
mod manager;
mod types;


pub use backend::{BackendRegistry, BackendSlot, CallCounts, NetworkBackend, SimulatedBackend};
pub use cfg::{
    BackendParams, BleConfig, CellConfig, ConfigVersion, GnssConfig, NetworkConfig, WifiAuth,
    WifiConfig,
};
pub use device::{DeviceDirectory, DeviceTable};
pub use error::{BackendError, NetworkError, field};
pub use manager::NetworkManager;
pub use types::{DeviceHandle, InterfaceKey, InterfaceState, NetworkType};
