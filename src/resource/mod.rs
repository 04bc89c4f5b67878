//! Resource accounting for leak detection.
//!
//! This module provides types and traits for:
//! - Classifying acquired resources ([`ResourceKind`])
//! - Reporting acquisitions and releases ([`ResourceCounter`], [`ResourceGuard`])
//! - A no-op counter for production builds ([`NoopCounter`])
//! - The counting ledger and its audit ([`ResourceLedger`], [`AuditReport`])
//! - Simulated heap and stack headroom ([`MemoryModel`])
//!
//! Every component that acquires a heap block, OS object or transport handle
//! reports it through an injected [`ResourceCounter`]. Swapping the ledger for
//! [`NoopCounter`] removes the accounting without touching call sites.

mod audit;
pub mod defaults;
mod ledger;
mod memory;

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod ledger_tests;

pub use audit::{AuditReport, AuditThresholds, ResourceCounts, Violation};
pub use ledger::ResourceLedger;
pub use memory::MemoryModel;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Class of a resource tracked by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// A heap allocation.
    HeapBlock,
    /// An OS object: task, mutex, queue, timer.
    OsObject,
    /// An open UART.
    Uart,
    /// An open I2C bus.
    I2c,
    /// An open SPI bus.
    Spi,
}

impl ResourceKind {
    /// Transport handle kinds, in audit order.
    pub const TRANSPORTS: [Self; 3] = [Self::Uart, Self::I2c, Self::Spi];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeapBlock => write!(f, "heap block"),
            Self::OsObject => write!(f, "OS object"),
            Self::Uart => write!(f, "UART"),
            Self::I2c => write!(f, "I2C"),
            Self::Spi => write!(f, "SPI"),
        }
    }
}

/// Sink for resource acquisition and release events.
///
/// Implementations must tolerate calls from many tasks at once.
pub trait ResourceCounter: Send + Sync + fmt::Debug {
    /// Records that one resource of `kind` was acquired.
    fn acquired(&self, kind: ResourceKind);

    /// Records that one resource of `kind` was released.
    fn released(&self, kind: ResourceKind);
}

/// Shared handle to an injected counter.
pub type SharedCounter = Arc<dyn ResourceCounter>;

/// Counter that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCounter;

impl NoopCounter {
    /// Returns a shared no-op counter.
    #[must_use]
    pub fn shared() -> SharedCounter {
        Arc::new(Self)
    }
}

impl ResourceCounter for NoopCounter {
    fn acquired(&self, _kind: ResourceKind) {}

    fn released(&self, _kind: ResourceKind) {}
}

/// A held resource that reports its own release when dropped.
#[derive(Debug)]
#[must_use = "the resource is released as soon as the guard is dropped"]
pub struct ResourceGuard {
    counter: SharedCounter,
    kind: ResourceKind,
}

impl ResourceGuard {
    /// Reports one acquisition of `kind` and returns its release guard.
    pub fn acquire(counter: &SharedCounter, kind: ResourceKind) -> Self {
        counter.acquired(kind);
        Self {
            counter: Arc::clone(counter),
            kind,
        }
    }

    /// Returns the kind of the held resource.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl Drop for ResourceGuard {
    fn drop(&mut self) {
        self.counter.released(self.kind);
    }
}
