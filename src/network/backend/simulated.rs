//! In-process backend that simulates a module on the other end of a UART.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::NetworkBackend;
use crate::network::{BackendError, BackendParams, DeviceHandle, NetworkType};
use crate::resource::{ResourceGuard, ResourceKind, SharedCounter};

/// Snapshot of how often each backend operation was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallCounts {
    /// Calls to `init`.
    pub init: usize,
    /// Calls to `deinit`.
    pub deinit: usize,
    /// Calls to `bring_up`.
    pub bring_up: usize,
    /// Calls to `take_down`.
    pub take_down: usize,
}

#[derive(Debug, Default)]
struct Calls {
    init: AtomicUsize,
    deinit: AtomicUsize,
    bring_up: AtomicUsize,
    take_down: AtomicUsize,
}

/// One armed failure, consumed by the next call of its operation.
#[derive(Debug, Default)]
struct Injected(Mutex<Option<BackendError>>);

impl Injected {
    fn arm(&self, error: BackendError) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    fn fire(&self) -> Result<(), BackendError> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .map_or(Ok(()), Err)
    }
}

fn simulated_failure() -> BackendError {
    BackendError::rejected("simulated failure")
}

/// Simulated transport backend.
///
/// Every operation sleeps for the configured latency (on the tokio clock, so
/// paused-time tests stay instant). `init` starts a worker that holds an
/// [`ResourceKind::OsObject`]; every connected interface holds a transport
/// handle ([`ResourceKind::I2c`] for GNSS, [`ResourceKind::Uart`] otherwise).
/// Both are reported to the injected counter and released symmetrically.
#[derive(Debug)]
pub struct SimulatedBackend {
    network_type: NetworkType,
    counter: SharedCounter,
    latency: Duration,
    worker: Mutex<Option<ResourceGuard>>,
    links: Mutex<HashMap<DeviceHandle, ResourceGuard>>,
    fail_init: Injected,
    fail_bring_up: Injected,
    fail_take_down: Injected,
    calls: Calls,
}

impl SimulatedBackend {
    /// Creates a zero-latency backend for `network_type`.
    #[must_use]
    pub fn new(network_type: NetworkType, counter: SharedCounter) -> Self {
        Self {
            network_type,
            counter,
            latency: Duration::ZERO,
            worker: Mutex::new(None),
            links: Mutex::new(HashMap::new()),
            fail_init: Injected::default(),
            fail_bring_up: Injected::default(),
            fail_take_down: Injected::default(),
            calls: Calls::default(),
        }
    }

    /// Sets the latency of every operation.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Returns the configured latency.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    /// Makes the next `init` fail with a rejection.
    pub fn fail_next_init(&self) {
        self.fail_next_init_with(simulated_failure());
    }

    /// Makes the next `init` fail with `error`.
    pub fn fail_next_init_with(&self, error: BackendError) {
        self.fail_init.arm(error);
    }

    /// Makes the next `bring_up` fail with a rejection.
    pub fn fail_next_bring_up(&self) {
        self.fail_next_bring_up_with(simulated_failure());
    }

    /// Makes the next `bring_up` fail with `error`.
    pub fn fail_next_bring_up_with(&self, error: BackendError) {
        self.fail_bring_up.arm(error);
    }

    /// Makes the next `take_down` fail with a rejection.
    pub fn fail_next_take_down(&self) {
        self.fail_next_take_down_with(simulated_failure());
    }

    /// Makes the next `take_down` fail with `error`.
    pub fn fail_next_take_down_with(&self, error: BackendError) {
        self.fail_take_down.arm(error);
    }

    /// Returns how often each operation was called.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            init: self.calls.init.load(Ordering::SeqCst),
            deinit: self.calls.deinit.load(Ordering::SeqCst),
            bring_up: self.calls.bring_up.load(Ordering::SeqCst),
            take_down: self.calls.take_down.load(Ordering::SeqCst),
        }
    }

    /// Returns true if the backend's worker is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns true if an interface is connected on `handle`.
    #[must_use]
    pub fn is_connected(&self, handle: DeviceHandle) -> bool {
        self.links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&handle)
    }

    /// Returns the number of connected interfaces.
    #[must_use]
    pub fn connected(&self) -> usize {
        self.links.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    const fn transport(&self) -> ResourceKind {
        match self.network_type {
            NetworkType::Gnss => ResourceKind::I2c,
            _ => ResourceKind::Uart,
        }
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl NetworkBackend for SimulatedBackend {
    fn network_type(&self) -> NetworkType {
        self.network_type
    }

    async fn init(&self) -> Result<(), BackendError> {
        self.calls.init.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.fail_init.fire()?;

        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if worker.is_none() {
            *worker = Some(ResourceGuard::acquire(&self.counter, ResourceKind::OsObject));
        }
        Ok(())
    }

    async fn deinit(&self) {
        self.calls.deinit.fetch_add(1, Ordering::SeqCst);
        self.wait().await;

        let dropped = {
            let mut links = self.links.lock().unwrap_or_else(PoisonError::into_inner);
            let dropped = links.len();
            links.clear();
            dropped
        };
        if dropped > 0 {
            tracing::debug!(
                "{} backend dropped {dropped} connection(s) on deinit",
                self.network_type
            );
        }
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    async fn bring_up(
        &self,
        handle: DeviceHandle,
        params: &BackendParams,
    ) -> Result<(), BackendError> {
        self.calls.bring_up.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.fail_bring_up.fire()?;

        if params.network_type() != self.network_type {
            return Err(BackendError::rejected(format!(
                "{} parameters sent to a {} module",
                params.network_type(),
                self.network_type
            )));
        }

        self.links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(handle)
            .or_insert_with(|| ResourceGuard::acquire(&self.counter, self.transport()));
        tracing::debug!("Simulated {} link up on {handle}: {params}", self.network_type);
        Ok(())
    }

    async fn take_down(&self, handle: DeviceHandle) -> Result<(), BackendError> {
        self.calls.take_down.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.fail_take_down.fire()?;

        self.links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle);
        tracing::debug!("Simulated {} link down on {handle}", self.network_type);
        Ok(())
    }
}
