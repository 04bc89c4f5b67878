//! Transport backends and the per-type dispatch registry.

mod registry;
mod simulated;



pub use registry::{BackendRegistry, BackendSlot};
pub use simulated::{CallCounts, SimulatedBackend};

use std::fmt;

use async_trait::async_trait;

use super::{BackendError, BackendParams, DeviceHandle, NetworkType};

/// Trait implemented by every transport backend.
///
/// # Design
///
/// - One backend per [`NetworkType`]; the registry dispatches by type
/// - Parameters arrive fully resolved; backends never see versioned configs
/// - Timeouts are the backend's own business and surface as [`BackendError`]
/// - Enables dependency injection for testing with [`SimulatedBackend`]
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use radionet::network::{BackendError, BackendParams, DeviceHandle, NetworkBackend, NetworkType};
///
/// #[derive(Debug)]
/// struct Loopback;
///
/// #[async_trait]
/// impl NetworkBackend for Loopback {
///     fn network_type(&self) -> NetworkType { NetworkType::Wifi }
///     async fn init(&self) -> Result<(), BackendError> { Ok(()) }
///     async fn deinit(&self) {}
///     async fn bring_up(&self, _: DeviceHandle, _: &BackendParams) -> Result<(), BackendError> { Ok(()) }
///     async fn take_down(&self, _: DeviceHandle) -> Result<(), BackendError> { Ok(()) }
/// }
/// ```
#[async_trait]
pub trait NetworkBackend: Send + Sync + fmt::Debug {
    /// Returns the network type this backend serves.
    fn network_type(&self) -> NetworkType;

    /// Prepares the backend for use.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the backend cannot start.
    async fn init(&self) -> Result<(), BackendError>;

    /// Releases everything the backend holds.
    async fn deinit(&self);

    /// Connects the interface on `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the module or network refuses, or times out.
    async fn bring_up(&self, handle: DeviceHandle, params: &BackendParams)
    -> Result<(), BackendError>;

    /// Disconnects the interface on `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the module refuses, or times out.
    async fn take_down(&self, handle: DeviceHandle) -> Result<(), BackendError>;
}
