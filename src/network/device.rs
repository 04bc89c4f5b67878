//! Device collaborator: which handles are currently open.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use super::DeviceHandle;

/// Trait for querying the device layer about handle validity.
///
/// # Design
///
/// - The device layer owns power rails, pin muxing and the handle itself
/// - This layer only asks whether a handle is currently open
/// - Enables dependency injection for testing with an in-memory table
pub trait DeviceDirectory: Send + Sync {
    /// Returns true if the handle refers to a currently open device.
    fn is_open(&self, handle: DeviceHandle) -> bool;
}

impl<D: DeviceDirectory + ?Sized> DeviceDirectory for std::sync::Arc<D> {
    fn is_open(&self, handle: DeviceHandle) -> bool {
        (**self).is_open(handle)
    }
}

/// In-memory device table.
///
/// Hands out sequential handles on [`DeviceTable::open`] and forgets them on
/// [`DeviceTable::close`]. Closing a device does not touch any interface
/// state; call `NetworkManager::detach_device` first.
#[derive(Debug, Default)]
pub struct DeviceTable {
    inner: Mutex<TableInner>,
}

#[derive(Debug, Default)]
struct TableInner {
    next: u32,
    open: BTreeSet<DeviceHandle>,
}

impl DeviceTable {
    /// Creates an empty device table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new device and returns its handle.
    pub fn open(&self) -> DeviceHandle {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next = inner.next.wrapping_add(1);
        let handle = DeviceHandle::new(inner.next);
        inner.open.insert(handle);
        tracing::debug!("Opened device {handle}");
        handle
    }

    /// Closes a device. Returns false if it was not open.
    pub fn close(&self, handle: DeviceHandle) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let closed = inner.open.remove(&handle);
        if closed {
            tracing::debug!("Closed device {handle}");
        }
        closed
    }

    /// Returns the number of open devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .open
            .len()
    }

    /// Returns true if no device is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeviceDirectory for DeviceTable {
    fn is_open(&self, handle: DeviceHandle) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .open
            .contains(&handle)
    }
}
