//! Versioned network configuration.
//!
//! This module provides:
//! - Caller-facing configuration structures ([`NetworkConfig`] and friends)
//! - Backend parameter structures ([`BackendParams`] and friends)
//! - The adapter between them ([`resolve`])
//! - Schema versions and field defaults ([`defaults`])

mod adapter;
pub mod defaults;
mod params;
mod schema;


pub use adapter::{check_type, resolve};
pub use params::{
    BackendParams, BleParams, CellCredentials, CellParams, GnssParams, NetworkSelection,
    WifiParams, WifiSecurity,
};
pub use schema::{
    BleConfig, BleRole, CellAuth, CellConfig, ConfigVersion, DynamicModel, GnssConfig, GnssModule,
    NetworkConfig, WifiAuth, WifiConfig,
};
