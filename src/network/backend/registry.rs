//! Backend registry: one slot per dispatchable network type.

use std::sync::Arc;

use super::NetworkBackend;
use crate::network::{BackendParams, DeviceHandle, NetworkError, NetworkType};

/// Registry entry for one network type.
#[derive(Debug, Clone, Default)]
pub enum BackendSlot {
    /// A backend is available.
    Registered(Arc<dyn NetworkBackend>),
    /// No backend is compiled in; every operation fails with
    /// [`NetworkError::NotImplemented`].
    #[default]
    Unimplemented,
}

impl BackendSlot {
    /// Returns true if a backend is registered.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}

/// Dispatch table from network type to backend.
///
/// The table is total: every dispatchable type has a slot, so a lookup can
/// only fail on [`NetworkType::None`] or an unimplemented slot.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    slots: [BackendSlot; 4],
}

const fn slot_index(ty: NetworkType) -> Option<usize> {
    match ty {
        NetworkType::None => None,
        NetworkType::Ble => Some(0),
        NetworkType::Cell => Some(1),
        NetworkType::Wifi => Some(2),
        NetworkType::Gnss => Some(3),
    }
}

impl BackendRegistry {
    /// Creates a registry with every slot unimplemented.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a backend, returning the registry for chaining.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidType`] if the backend claims
    /// [`NetworkType::None`].
    pub fn with_backend(mut self, backend: Arc<dyn NetworkBackend>) -> Result<Self, NetworkError> {
        self.register(backend)?;
        Ok(self)
    }

    /// Registers a backend in the slot of its network type, replacing
    /// whatever was there.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidType`] if the backend claims
    /// [`NetworkType::None`].
    pub fn register(&mut self, backend: Arc<dyn NetworkBackend>) -> Result<(), NetworkError> {
        let ty = backend.network_type();
        let index = slot_index(ty).ok_or(NetworkError::InvalidType(ty.as_raw()))?;
        self.slots[index] = BackendSlot::Registered(backend);
        Ok(())
    }

    /// Returns the slot for a network type.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidType`] for [`NetworkType::None`].
    pub fn slot(&self, ty: NetworkType) -> Result<&BackendSlot, NetworkError> {
        slot_index(ty)
            .map(|index| &self.slots[index])
            .ok_or(NetworkError::InvalidType(ty.as_raw()))
    }

    /// Returns the backend for a network type.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidType`] for [`NetworkType::None`] and
    /// [`NetworkError::NotImplemented`] for an unimplemented slot.
    pub fn backend(&self, ty: NetworkType) -> Result<&Arc<dyn NetworkBackend>, NetworkError> {
        match self.slot(ty)? {
            BackendSlot::Registered(backend) => Ok(backend),
            BackendSlot::Unimplemented => Err(NetworkError::NotImplemented(ty)),
        }
    }

    /// Returns the types with a registered backend, in registry order.
    pub fn registered_types(&self) -> impl Iterator<Item = NetworkType> + '_ {
        NetworkType::DISPATCHABLE
            .into_iter()
            .zip(&self.slots)
            .filter(|(_, slot)| slot.is_registered())
            .map(|(ty, _)| ty)
    }

    /// Initializes every registered backend in registry order.
    ///
    /// If one fails, the backends already initialized are deinitialized
    /// again before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BackendFailure`] from the first failing backend.
    pub async fn init_all(&self) -> Result<(), NetworkError> {
        let mut started: Vec<&Arc<dyn NetworkBackend>> = Vec::new();

        for ty in self.registered_types() {
            if let Err(e) = self.init(ty).await {
                for backend in started.into_iter().rev() {
                    backend.deinit().await;
                }
                return Err(e);
            }
            started.push(self.backend(ty)?);
        }

        Ok(())
    }

    /// Initializes the backend of a single network type.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidType`] for [`NetworkType::None`],
    /// [`NetworkError::NotImplemented`] for an unimplemented slot and
    /// [`NetworkError::BackendFailure`] if the backend fails to start.
    pub async fn init(&self, ty: NetworkType) -> Result<(), NetworkError> {
        self.backend(ty)?.init().await.map_err(|source| {
            tracing::warn!("{ty} backend failed to initialize: {source}");
            NetworkError::backend(ty, source)
        })?;
        tracing::debug!("{ty} backend initialized");
        Ok(())
    }

    /// Deinitializes every registered backend in reverse registry order.
    pub async fn deinit_all(&self) {
        for slot in self.slots.iter().rev() {
            if let BackendSlot::Registered(backend) = slot {
                backend.deinit().await;
                tracing::debug!("{} backend deinitialized", backend.network_type());
            }
        }
    }

    /// Brings up the interface on `handle` through the backend matching
    /// `params`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NotImplemented`] for an unimplemented slot and
    /// [`NetworkError::BackendFailure`] if the backend fails.
    pub async fn bring_up(
        &self,
        handle: DeviceHandle,
        params: &BackendParams,
    ) -> Result<(), NetworkError> {
        let ty = params.network_type();
        self.backend(ty)?
            .bring_up(handle, params)
            .await
            .map_err(|source| NetworkError::backend(ty, source))
    }

    /// Takes down the `ty` interface on `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NotImplemented`] for an unimplemented slot and
    /// [`NetworkError::BackendFailure`] if the backend fails.
    pub async fn take_down(&self, handle: DeviceHandle, ty: NetworkType) -> Result<(), NetworkError> {
        self.backend(ty)?
            .take_down(handle)
            .await
            .map_err(|source| NetworkError::backend(ty, source))
    }
}
