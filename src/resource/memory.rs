//! Simulated memory model for headroom sampling.
//!
//! Hosts have no fixed heap or task stack to measure, so the simulator
//! derives free-memory figures from what the ledger currently holds.

use super::{ResourceCounts, ResourceKind, ResourceLedger};

/// Fixed memory sizes and per-resource costs of a simulated target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryModel {
    /// Total heap of the target.
    pub heap_bytes: u64,
    /// Total stack of the main task.
    pub stack_bytes: u64,
    /// Stack the main task uses with nothing open.
    pub stack_base_bytes: u64,
    /// Stack used per open transport handle (driver callbacks run on it).
    pub stack_per_transport_bytes: u64,
}

impl Default for MemoryModel {
    fn default() -> Self {
        Self {
            heap_bytes: 256 * 1024,
            stack_bytes: 16 * 1024,
            stack_base_bytes: 4 * 1024,
            stack_per_transport_bytes: 256,
        }
    }
}

impl MemoryModel {
    /// Heap bytes one outstanding resource of `kind` occupies.
    #[must_use]
    pub const fn heap_cost(kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::HeapBlock => 256,
            ResourceKind::OsObject => 128,
            ResourceKind::Uart | ResourceKind::I2c | ResourceKind::Spi => 512,
        }
    }

    /// Free heap while `counts` are outstanding.
    #[must_use]
    pub fn heap_free(&self, counts: &ResourceCounts) -> u64 {
        let used = [ResourceKind::HeapBlock, ResourceKind::OsObject]
            .into_iter()
            .chain(ResourceKind::TRANSPORTS)
            .map(|kind| outstanding(counts, kind).saturating_mul(Self::heap_cost(kind)))
            .fold(0, u64::saturating_add);
        self.heap_bytes.saturating_sub(used)
    }

    /// Free main-task stack while `counts` are outstanding.
    #[must_use]
    pub fn stack_free(&self, counts: &ResourceCounts) -> u64 {
        let transports = ResourceKind::TRANSPORTS
            .into_iter()
            .map(|kind| outstanding(counts, kind))
            .fold(0, u64::saturating_add);
        let used = self
            .stack_base_bytes
            .saturating_add(transports.saturating_mul(self.stack_per_transport_bytes));
        self.stack_bytes.saturating_sub(used)
    }

    /// Records the current heap and stack headroom into the ledger.
    pub fn sample(&self, ledger: &ResourceLedger) {
        let counts = ledger.counts();
        ledger.record_heap_free(self.heap_free(&counts));
        ledger.record_stack_free(self.stack_free(&counts));
    }
}

/// Negative balances occupy nothing.
fn outstanding(counts: &ResourceCounts, kind: ResourceKind) -> u64 {
    u64::try_from(counts.outstanding(kind)).unwrap_or(0)
}
