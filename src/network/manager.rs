//! Network lifecycle manager.
//!
//! Coordinates the Down/Up state machine of every (device, network type)
//! pair. The map of tracked pairs sits behind a short-lived synchronous lock;
//! each pair has its own async lock that is held across backend I/O, so
//! transitions on the same pair are serialized while different pairs proceed
//! independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::backend::BackendRegistry;
use super::cfg::{self, NetworkConfig};
use super::device::DeviceDirectory;
use super::error::field;
use super::{DeviceHandle, InterfaceKey, InterfaceState, NetworkError, NetworkType};
use crate::resource::{ResourceGuard, ResourceKind, SharedCounter};

type EntryLock = Arc<AsyncMutex<InterfaceEntry>>;

/// Lifecycle manager for network interfaces on open devices.
///
/// # Ownership
///
/// - Devices are owned by the device layer; the manager only asks
///   [`DeviceDirectory::is_open`] and never closes anything
/// - Accepted configurations are copied and owned by the manager until the
///   pair is removed or the manager is deinitialized
/// - Every resource the manager holds is reported to the injected counter:
///   one [`ResourceKind::OsObject`] for the manager itself, one per tracked
///   pair, and one [`ResourceKind::HeapBlock`] per retained configuration
#[derive(Debug)]
pub struct NetworkManager<D> {
    devices: D,
    registry: BackendRegistry,
    counter: SharedCounter,
    table: Mutex<Table>,
    lifecycle: AsyncMutex<()>,
    _table_lock: ResourceGuard,
}

#[derive(Debug, Default)]
struct Table {
    initialized: bool,
    entries: HashMap<InterfaceKey, EntryLock>,
    committed: HashMap<InterfaceKey, Committed>,
}

/// Last committed outcome of a pair, readable without the pair's lock.
#[derive(Debug, Clone)]
struct Committed {
    state: InterfaceState,
    config: Option<NetworkConfig>,
}

#[derive(Debug)]
struct InterfaceEntry {
    state: InterfaceState,
    config: Option<RetainedConfig>,
    retired: bool,
    _lock: ResourceGuard,
}

#[derive(Debug)]
struct RetainedConfig {
    config: NetworkConfig,
    heap: ResourceGuard,
}

impl InterfaceEntry {
    fn new(counter: &SharedCounter) -> Self {
        Self {
            state: InterfaceState::Down,
            config: None,
            retired: false,
            _lock: ResourceGuard::acquire(counter, ResourceKind::OsObject),
        }
    }

    /// True once the pair has come up at least once.
    const fn is_established(&self) -> bool {
        self.config.is_some()
    }
}

impl<D: DeviceDirectory> NetworkManager<D> {
    /// Creates an uninitialized manager.
    #[must_use]
    pub fn new(devices: D, registry: BackendRegistry, counter: SharedCounter) -> Self {
        let table_lock = ResourceGuard::acquire(&counter, ResourceKind::OsObject);
        Self {
            devices,
            registry,
            counter,
            table: Mutex::new(Table::default()),
            lifecycle: AsyncMutex::new(()),
            _table_lock: table_lock,
        }
    }

    /// Returns the backend registry.
    #[must_use]
    pub const fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Returns the device collaborator.
    #[must_use]
    pub const fn devices(&self) -> &D {
        &self.devices
    }

    /// Returns true between a successful [`init`](Self::init) and
    /// [`deinit`](Self::deinit).
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.table().initialized
    }

    /// Returns the number of tracked (device, type) pairs.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.table().entries.len()
    }

    /// Initializes every registered backend. A no-op if already initialized.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BackendFailure`] if a backend fails to start;
    /// the manager then stays uninitialized.
    pub async fn init(&self) -> Result<(), NetworkError> {
        let _lifecycle = self.lifecycle.lock().await;

        if self.is_initialized() {
            tracing::debug!("Network API already initialized");
            return Ok(());
        }

        self.registry.init_all().await?;
        self.table().initialized = true;
        tracing::info!("Network API initialized");
        Ok(())
    }

    /// Takes down every Up interface, forgets every tracked pair and
    /// deinitializes the backends. A no-op if not initialized.
    ///
    /// Teardown failures are logged and otherwise ignored. Devices are not
    /// closed; callers that relied on deinit releasing their devices must
    /// close them through the device layer themselves.
    pub async fn deinit(&self) {
        let _lifecycle = self.lifecycle.lock().await;

        let entries = {
            let mut table = self.table();
            if !table.initialized {
                tracing::debug!("Network API not initialized, nothing to deinit");
                return;
            }
            table.initialized = false;
            table.committed.clear();
            std::mem::take(&mut table.entries)
        };

        let count = entries.len();
        for (key, entry) in entries {
            let mut entry = entry.lock_owned().await;
            entry.retired = true;
            if entry.state.is_up() {
                if let Err(e) = self.registry.take_down(key.handle, key.network_type).await {
                    tracing::warn!("Failed to take down {key} during deinit: {e}");
                }
                entry.state = InterfaceState::Down;
            }
            entry.config = None;
        }

        self.registry.deinit_all().await;
        tracing::info!("Network API deinitialized ({count} association(s) forgotten)");
    }

    /// Brings up the `ty` interface on `handle`.
    ///
    /// With `config` omitted, the configuration of the last successful `up`
    /// on this pair is reused. A pair that is already Up is left alone.
    ///
    /// # Errors
    ///
    /// Returns, in order of checking:
    /// - [`NetworkError::NotInitialized`] outside `init`/`deinit`
    /// - [`NetworkError::InvalidType`] for [`NetworkType::None`]
    /// - [`NetworkError::TypeMismatch`] if `config` is tagged differently
    /// - [`NetworkError::UnknownDevice`] if `handle` is not open
    /// - [`NetworkError::MissingRequiredField`] if no configuration is known
    /// - adapter errors, then [`NetworkError::NotImplemented`] or
    ///   [`NetworkError::BackendFailure`] from dispatch
    pub async fn up(
        &self,
        handle: DeviceHandle,
        ty: NetworkType,
        config: Option<NetworkConfig>,
    ) -> Result<(), NetworkError> {
        self.ensure_initialized()?;
        ty.ensure_dispatchable()?;
        if let Some(config) = &config {
            cfg::check_type(ty, config)?;
        }

        let key = InterfaceKey::new(handle, ty);
        let (lock, mut entry) = loop {
            let lock = self.claim(key)?;
            let entry = Arc::clone(&lock).lock_owned().await;
            if !entry.retired {
                break (lock, entry);
            }
        };

        if entry.state.is_up() {
            tracing::debug!("{key} already up");
            return Ok(());
        }

        let result = self.bring_up(key, &mut entry, config).await;
        match result {
            Ok(()) => self.publish(key, &lock, &entry),
            Err(_) if !entry.is_established() => self.forget(key, &lock, &mut entry),
            Err(_) => {}
        }
        result
    }

    /// Takes down the `ty` interface on `handle`.
    ///
    /// A pair that is Down or not tracked is left alone. If the backend
    /// fails, the interface stays Up and the error is returned so the caller
    /// can retry.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NotInitialized`], [`NetworkError::InvalidType`],
    /// or the backend's error.
    pub async fn down(&self, handle: DeviceHandle, ty: NetworkType) -> Result<(), NetworkError> {
        self.ensure_initialized()?;
        ty.ensure_dispatchable()?;

        let key = InterfaceKey::new(handle, ty);
        let Some((lock, mut entry)) = self.lock_tracked(key).await? else {
            tracing::debug!("{key} not tracked, already down");
            return Ok(());
        };

        self.take_down(key, &mut entry).await?;
        self.publish(key, &lock, &entry);
        Ok(())
    }

    /// Takes the `ty` interface on `handle` down if needed and forgets the
    /// pair along with its retained configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NotInitialized`], [`NetworkError::InvalidType`],
    /// or the backend's error; on a backend error the pair is kept.
    pub async fn remove(&self, handle: DeviceHandle, ty: NetworkType) -> Result<(), NetworkError> {
        self.ensure_initialized()?;
        ty.ensure_dispatchable()?;

        let key = InterfaceKey::new(handle, ty);
        let Some((lock, mut entry)) = self.lock_tracked(key).await? else {
            return Ok(());
        };

        self.take_down(key, &mut entry).await?;
        self.forget(key, &lock, &mut entry);
        tracing::info!("{key} removed");
        Ok(())
    }

    /// Removes every pair tracked on `handle`, typically before the device
    /// layer closes it.
    ///
    /// Every type is attempted even if one fails.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NotInitialized`] or the first removal error.
    pub async fn detach_device(&self, handle: DeviceHandle) -> Result<(), NetworkError> {
        self.ensure_initialized()?;

        let mut types: Vec<NetworkType> = self
            .table()
            .entries
            .keys()
            .filter(|key| key.handle == handle)
            .map(|key| key.network_type)
            .collect();
        types.sort_unstable();

        let mut first_error = None;
        for ty in types {
            if let Err(e) = self.remove(handle, ty).await {
                tracing::warn!("Failed to detach {handle}/{ty}: {e}");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Returns the committed state of the `ty` interface on `handle`; Down
    /// if untracked.
    ///
    /// Never waits for an in-flight transition: a pair that is being brought
    /// up reads as its previous state until the backend call returns.
    #[must_use]
    pub fn state(&self, handle: DeviceHandle, ty: NetworkType) -> InterfaceState {
        self.table()
            .committed
            .get(&InterfaceKey::new(handle, ty))
            .map_or(InterfaceState::Down, |committed| committed.state)
    }

    /// Returns a copy of the configuration retained for the pair, if any.
    ///
    /// Like [`state`](Self::state), reads the last committed outcome.
    #[must_use]
    pub fn applied_config(&self, handle: DeviceHandle, ty: NetworkType) -> Option<NetworkConfig> {
        self.table()
            .committed
            .get(&InterfaceKey::new(handle, ty))
            .and_then(|committed| committed.config.clone())
    }

    fn table(&self) -> std::sync::MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_initialized(&self) -> Result<(), NetworkError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(NetworkError::NotInitialized)
        }
    }

    /// Returns the entry for `key`, creating it if the device is open.
    fn claim(&self, key: InterfaceKey) -> Result<EntryLock, NetworkError> {
        let mut table = self.table();
        if !table.initialized {
            return Err(NetworkError::NotInitialized);
        }
        if let Some(entry) = table.entries.get(&key) {
            return Ok(Arc::clone(entry));
        }
        if !self.devices.is_open(key.handle) {
            return Err(NetworkError::UnknownDevice(key.handle));
        }

        let entry = Arc::new(AsyncMutex::new(InterfaceEntry::new(&self.counter)));
        table.entries.insert(key, Arc::clone(&entry));
        tracing::debug!("Tracking {key}");
        Ok(entry)
    }

    /// Locks the entry for `key` if it is tracked.
    async fn lock_tracked(
        &self,
        key: InterfaceKey,
    ) -> Result<Option<(EntryLock, OwnedMutexGuard<InterfaceEntry>)>, NetworkError> {
        loop {
            let lock = {
                let table = self.table();
                if !table.initialized {
                    return Err(NetworkError::NotInitialized);
                }
                match table.entries.get(&key) {
                    Some(entry) => Arc::clone(entry),
                    None => return Ok(None),
                }
            };

            let entry = Arc::clone(&lock).lock_owned().await;
            if !entry.retired {
                return Ok(Some((lock, entry)));
            }
        }
    }

    async fn bring_up(
        &self,
        key: InterfaceKey,
        entry: &mut InterfaceEntry,
        supplied: Option<NetworkConfig>,
    ) -> Result<(), NetworkError> {
        if !self.devices.is_open(key.handle) {
            return Err(NetworkError::UnknownDevice(key.handle));
        }

        let params = match (&supplied, &entry.config) {
            (Some(config), _) | (None, Some(RetainedConfig { config, .. })) => {
                cfg::resolve(key.network_type, config)?
            }
            (None, None) => {
                return Err(NetworkError::missing(key.network_type, field::CONFIGURATION));
            }
        };

        if let Err(e) = self.registry.bring_up(key.handle, &params).await {
            tracing::warn!("Failed to bring up {key}: {e}");
            return Err(e);
        }

        if let Some(config) = supplied {
            let heap = entry.config.take().map_or_else(
                || ResourceGuard::acquire(&self.counter, ResourceKind::HeapBlock),
                |old| old.heap,
            );
            entry.config = Some(RetainedConfig { config, heap });
        }
        entry.state = InterfaceState::Up;
        tracing::info!("{key} up: {params}");
        Ok(())
    }

    async fn take_down(
        &self,
        key: InterfaceKey,
        entry: &mut InterfaceEntry,
    ) -> Result<(), NetworkError> {
        if !entry.state.is_up() {
            tracing::debug!("{key} already down");
            return Ok(());
        }

        if let Err(e) = self.registry.take_down(key.handle, key.network_type).await {
            tracing::warn!("Failed to take down {key}, still up: {e}");
            return Err(e);
        }

        entry.state = InterfaceState::Down;
        tracing::info!("{key} down");
        Ok(())
    }

    /// Drops the pair from the table and marks its entry retired so that
    /// callers waiting on the entry look it up again.
    fn forget(&self, key: InterfaceKey, lock: &EntryLock, entry: &mut InterfaceEntry) {
        entry.retired = true;
        entry.config = None;

        let mut table = self.table();
        if table
            .entries
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, lock))
        {
            table.entries.remove(&key);
            table.committed.remove(&key);
            tracing::debug!("Forgot {key}");
        }
    }

    /// Records the entry's outcome for lock-free readers, unless the entry
    /// has been replaced or dropped from the table meanwhile.
    fn publish(&self, key: InterfaceKey, lock: &EntryLock, entry: &InterfaceEntry) {
        let mut table = self.table();
        if table
            .entries
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, lock))
        {
            let committed = Committed {
                state: entry.state,
                config: entry.config.as_ref().map(|retained| retained.config.clone()),
            };
            table.committed.insert(key, committed);
        }
    }
}
