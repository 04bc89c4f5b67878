//! radionet: network interface lifecycle layer
//!
//! A library for bringing BLE, cellular, Wi-Fi and GNSS interfaces up and
//! down on open devices through per-type backends, with versioned
//! configuration and resource leak auditing.

pub mod config;
pub mod network;
pub mod resource;
