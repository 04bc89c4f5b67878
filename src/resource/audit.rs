//! Audit results: counter snapshots and itemized violations.

use std::fmt;

use serde::Serialize;

use super::{ResourceKind, defaults};

/// Point-in-time snapshot of every ledger counter.
///
/// Outstanding counts are signed so that a release without a matching
/// acquisition shows up as a negative value instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResourceCounts {
    /// Minimum free main-task stack ever sampled, if stack sampling is supported.
    pub stack_min_free: Option<u64>,
    /// Minimum free heap ever sampled, if heap sampling is supported.
    pub heap_min_free: Option<u64>,
    /// Outstanding heap allocations.
    pub heap_allocations: i64,
    /// Outstanding OS objects.
    pub os_objects: i64,
    /// Outstanding UART handles.
    pub uart: i64,
    /// Outstanding I2C handles.
    pub i2c: i64,
    /// Outstanding SPI handles.
    pub spi: i64,
}

impl ResourceCounts {
    /// Returns the outstanding count for a resource kind.
    #[must_use]
    pub const fn outstanding(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::HeapBlock => self.heap_allocations,
            ResourceKind::OsObject => self.os_objects,
            ResourceKind::Uart => self.uart,
            ResourceKind::I2c => self.i2c,
            ResourceKind::Spi => self.spi,
        }
    }
}

/// Limits the minimum-free metrics must stay at or above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditThresholds {
    /// Minimum heap bytes that must always have been free.
    pub min_free_heap_bytes: u64,
    /// Minimum main-task stack bytes that must always have been free.
    pub min_free_stack_bytes: u64,
}

impl Default for AuditThresholds {
    fn default() -> Self {
        Self {
            min_free_heap_bytes: defaults::MIN_FREE_HEAP_BYTES,
            min_free_stack_bytes: defaults::MIN_FREE_STACK_BYTES,
        }
    }
}

/// A single failed audit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "check", rename_all = "kebab-case")]
pub enum Violation {
    /// The main task stack dipped below its headroom threshold.
    StackHeadroom {
        /// Minimum free bytes observed.
        min_free: u64,
        /// Threshold in bytes.
        required: u64,
    },
    /// The heap dipped below its headroom threshold.
    HeapHeadroom {
        /// Minimum free bytes observed.
        min_free: u64,
        /// Threshold in bytes.
        required: u64,
    },
    /// Heap allocations without a matching free.
    HeapAllocations {
        /// Outstanding allocations.
        outstanding: i64,
    },
    /// OS object count differs from the expected baseline.
    OsObjects {
        /// Expected outstanding OS objects.
        expected: i64,
        /// Observed outstanding OS objects.
        actual: i64,
    },
    /// Transport handles left open.
    TransportHandles {
        /// Kind of transport.
        kind: ResourceKind,
        /// Outstanding handles.
        outstanding: i64,
    },
}

impl Violation {
    /// Returns how far the observed value is from an acceptable one.
    #[must_use]
    pub fn excess(&self) -> i64 {
        match *self {
            Self::StackHeadroom { min_free, required } | Self::HeapHeadroom { min_free, required } => {
                i64::try_from(required.saturating_sub(min_free)).unwrap_or(i64::MAX)
            }
            Self::HeapAllocations { outstanding } | Self::TransportHandles { outstanding, .. } => {
                outstanding
            }
            Self::OsObjects { expected, actual } => actual - expected,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackHeadroom { min_free, required } => write!(
                f,
                "main task stack had a minimum of {min_free} byte(s) free (minimum is {required})"
            ),
            Self::HeapHeadroom { min_free, required } => write!(
                f,
                "heap had a minimum of {min_free} byte(s) free (minimum is {required})"
            ),
            Self::HeapAllocations { outstanding } => {
                write!(f, "{outstanding} outstanding heap allocation(s)")
            }
            Self::OsObjects { expected, actual } => write!(
                f,
                "expected {expected} outstanding OS object(s) but got {actual}"
            ),
            Self::TransportHandles { kind, outstanding } => {
                write!(f, "{outstanding} {kind} handle(s) outstanding")
            }
        }
    }
}

/// Result of a ledger audit.
///
/// An audit never fails: problems are reported as [`Violation`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// True if no check failed.
    pub clean: bool,
    /// The counters the checks were run against.
    pub counts: ResourceCounts,
    /// Every failed check, in check order.
    pub violations: Vec<Violation>,
}

impl AuditReport {
    pub(super) fn new(counts: ResourceCounts, violations: Vec<Violation>) -> Self {
        Self {
            clean: violations.is_empty(),
            counts,
            violations,
        }
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clean {
            return write!(
                f,
                "resources are good ({} outstanding OS object(s))",
                self.counts.os_objects
            );
        }

        write!(f, "{} resource violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "; {violation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod violation {
        use super::*;

        #[test]
        fn os_objects_excess_is_signed_difference() {
            let over = Violation::OsObjects {
                expected: 1,
                actual: 3,
            };
            let under = Violation::OsObjects {
                expected: 2,
                actual: 1,
            };

            assert_eq!(over.excess(), 2);
            assert_eq!(under.excess(), -1);
        }

        #[test]
        fn headroom_excess_is_shortfall() {
            let violation = Violation::HeapHeadroom {
                min_free: 1000,
                required: 1024,
            };
            assert_eq!(violation.excess(), 24);
        }

        #[test]
        fn transport_display_names_kind() {
            let violation = Violation::TransportHandles {
                kind: ResourceKind::Spi,
                outstanding: 2,
            };
            assert_eq!(violation.to_string(), "2 SPI handle(s) outstanding");
        }

        #[test]
        fn serializes_with_check_tag() {
            let violation = Violation::HeapAllocations { outstanding: 3 };
            let json = serde_json::to_value(violation).unwrap();

            assert_eq!(json["check"], "heap-allocations");
            assert_eq!(json["outstanding"], 3);
        }
    }

    mod audit_report {
        use super::*;

        #[test]
        fn clean_without_violations() {
            let report = AuditReport::new(ResourceCounts::default(), vec![]);

            assert!(report.clean);
            assert!(report.to_string().contains("resources are good"));
        }

        #[test]
        fn not_clean_lists_each_violation() {
            let report = AuditReport::new(
                ResourceCounts::default(),
                vec![
                    Violation::HeapAllocations { outstanding: 1 },
                    Violation::TransportHandles {
                        kind: ResourceKind::Uart,
                        outstanding: 1,
                    },
                ],
            );
            let message = report.to_string();

            assert!(!report.clean);
            assert!(message.starts_with("2 resource violation(s)"));
            assert!(message.contains("heap allocation"));
            assert!(message.contains("UART"));
        }
    }

    #[test]
    fn counts_outstanding_maps_each_kind() {
        let counts = ResourceCounts {
            heap_allocations: 1,
            os_objects: 2,
            uart: 3,
            i2c: 4,
            spi: 5,
            ..ResourceCounts::default()
        };

        assert_eq!(counts.outstanding(ResourceKind::HeapBlock), 1);
        assert_eq!(counts.outstanding(ResourceKind::OsObject), 2);
        assert_eq!(counts.outstanding(ResourceKind::Uart), 3);
        assert_eq!(counts.outstanding(ResourceKind::I2c), 4);
        assert_eq!(counts.outstanding(ResourceKind::Spi), 5);
    }

    #[test]
    fn default_thresholds_come_from_defaults() {
        let thresholds = AuditThresholds::default();

        assert_eq!(thresholds.min_free_heap_bytes, defaults::MIN_FREE_HEAP_BYTES);
        assert_eq!(thresholds.min_free_stack_bytes, defaults::MIN_FREE_STACK_BYTES);
    }
}
