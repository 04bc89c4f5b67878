//! Atomic resource ledger and its audit.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use super::audit::{AuditReport, AuditThresholds, ResourceCounts, Violation};
use super::{ResourceCounter, ResourceKind};

/// Sentinel for a minimum-free metric that was never sampled.
const NOT_SAMPLED: u64 = u64::MAX;

/// Passive counters for every resource class.
///
/// Counters are plain atomics: any number of tasks may acquire and release
/// concurrently, and [`ResourceLedger::counts`] never blocks them. Each
/// counter is read individually, so a snapshot taken while other tasks are
/// mid-transition may pair an older value of one counter with a newer value
/// of another; audits are meant to run at quiescent test boundaries.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use radionet::resource::{ResourceGuard, ResourceKind, ResourceLedger, SharedCounter};
///
/// let ledger = Arc::new(ResourceLedger::new());
/// let counter: SharedCounter = ledger.clone();
///
/// let uart = ResourceGuard::acquire(&counter, ResourceKind::Uart);
/// assert!(!ledger.audit(0, false).clean);
///
/// drop(uart);
/// assert!(ledger.audit(0, false).clean);
/// ```
#[derive(Debug)]
pub struct ResourceLedger {
    thresholds: AuditThresholds,
    heap_allocations: AtomicI64,
    os_objects: AtomicI64,
    uart: AtomicI64,
    i2c: AtomicI64,
    spi: AtomicI64,
    heap_min_free: AtomicU64,
    stack_min_free: AtomicU64,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLedger {
    /// Creates a ledger with default thresholds and all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_thresholds(AuditThresholds::default())
    }

    /// Creates a ledger with custom headroom thresholds.
    #[must_use]
    pub const fn with_thresholds(thresholds: AuditThresholds) -> Self {
        Self {
            thresholds,
            heap_allocations: AtomicI64::new(0),
            os_objects: AtomicI64::new(0),
            uart: AtomicI64::new(0),
            i2c: AtomicI64::new(0),
            spi: AtomicI64::new(0),
            heap_min_free: AtomicU64::new(NOT_SAMPLED),
            stack_min_free: AtomicU64::new(NOT_SAMPLED),
        }
    }

    /// Returns the configured thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> AuditThresholds {
        self.thresholds
    }

    /// Records a free-heap sample; the ledger keeps the minimum ever seen.
    pub fn record_heap_free(&self, bytes: u64) {
        self.heap_min_free.fetch_min(bytes, Ordering::SeqCst);
    }

    /// Records a free-stack sample for the main task; the minimum is kept.
    pub fn record_stack_free(&self, bytes: u64) {
        self.stack_min_free.fetch_min(bytes, Ordering::SeqCst);
    }

    /// Takes a snapshot of every counter.
    #[must_use]
    pub fn counts(&self) -> ResourceCounts {
        ResourceCounts {
            stack_min_free: sampled(self.stack_min_free.load(Ordering::SeqCst)),
            heap_min_free: sampled(self.heap_min_free.load(Ordering::SeqCst)),
            heap_allocations: self.heap_allocations.load(Ordering::SeqCst),
            os_objects: self.os_objects.load(Ordering::SeqCst),
            uart: self.uart.load(Ordering::SeqCst),
            i2c: self.i2c.load(Ordering::SeqCst),
            spi: self.spi.load(Ordering::SeqCst),
        }
    }

    /// Checks that every resource was released and headroom stayed in limits.
    ///
    /// The report is clean only if:
    /// - no heap allocation is outstanding,
    /// - exactly `expected_os_objects` OS objects are outstanding,
    /// - no UART, I2C or SPI handle is outstanding,
    /// - each sampled minimum-free metric is at or above its threshold.
    ///
    /// Metrics that were never sampled are skipped. With `emit_diagnostics`
    /// every check is logged; violations go out at `warn` level.
    #[must_use]
    pub fn audit(&self, expected_os_objects: i64, emit_diagnostics: bool) -> AuditReport {
        let counts = self.counts();
        let mut violations = Vec::new();

        if let Some(min_free) = counts.stack_min_free {
            let required = self.thresholds.min_free_stack_bytes;
            if emit_diagnostics {
                tracing::info!(
                    "Main task stack had a minimum of {min_free} byte(s) free (minimum is {required})"
                );
            }
            if min_free < required {
                violations.push(Violation::StackHeadroom { min_free, required });
            }
        }

        if let Some(min_free) = counts.heap_min_free {
            let required = self.thresholds.min_free_heap_bytes;
            if emit_diagnostics {
                tracing::info!(
                    "Heap had a minimum of {min_free} byte(s) free (minimum is {required})"
                );
            }
            if min_free < required {
                violations.push(Violation::HeapHeadroom { min_free, required });
            }
        }

        if counts.heap_allocations != 0 {
            violations.push(Violation::HeapAllocations {
                outstanding: counts.heap_allocations,
            });
        }

        if counts.os_objects != expected_os_objects {
            violations.push(Violation::OsObjects {
                expected: expected_os_objects,
                actual: counts.os_objects,
            });
        }

        for kind in ResourceKind::TRANSPORTS {
            let outstanding = counts.outstanding(kind);
            if outstanding != 0 {
                violations.push(Violation::TransportHandles { kind, outstanding });
            }
        }

        let report = AuditReport::new(counts, violations);
        if emit_diagnostics {
            log_report(&report);
        }
        report
    }

    const fn counter(&self, kind: ResourceKind) -> &AtomicI64 {
        match kind {
            ResourceKind::HeapBlock => &self.heap_allocations,
            ResourceKind::OsObject => &self.os_objects,
            ResourceKind::Uart => &self.uart,
            ResourceKind::I2c => &self.i2c,
            ResourceKind::Spi => &self.spi,
        }
    }
}

impl ResourceCounter for ResourceLedger {
    fn acquired(&self, kind: ResourceKind) {
        self.counter(kind).fetch_add(1, Ordering::SeqCst);
    }

    fn released(&self, kind: ResourceKind) {
        self.counter(kind).fetch_sub(1, Ordering::SeqCst);
    }
}

const fn sampled(value: u64) -> Option<u64> {
    if value == NOT_SAMPLED {
        None
    } else {
        Some(value)
    }
}

fn log_report(report: &AuditReport) {
    for violation in &report.violations {
        tracing::warn!("Resource check failed: {violation}");
    }
    if report.clean {
        tracing::info!(
            "Resources are good ({} outstanding OS object(s), as expected)",
            report.counts.os_objects
        );
    }
}
