//! Tests for the resource ledger.

use std::sync::Arc;

use super::{
    AuditThresholds, ResourceCounter, ResourceGuard, ResourceKind, ResourceLedger, SharedCounter,
    Violation,
};

fn shared(ledger: &Arc<ResourceLedger>) -> SharedCounter {
    ledger.clone()
}

mod counting {
    use super::*;

    #[test]
    fn new_ledger_counts_nothing() {
        let counts = ResourceLedger::new().counts();

        assert_eq!(counts.heap_allocations, 0);
        assert_eq!(counts.os_objects, 0);
        assert_eq!(counts.uart, 0);
        assert_eq!(counts.i2c, 0);
        assert_eq!(counts.spi, 0);
        assert_eq!(counts.heap_min_free, None);
        assert_eq!(counts.stack_min_free, None);
    }

    #[test]
    fn acquire_and_release_are_per_kind() {
        let ledger = ResourceLedger::new();

        ledger.acquired(ResourceKind::I2c);
        ledger.acquired(ResourceKind::I2c);
        ledger.acquired(ResourceKind::Spi);
        ledger.released(ResourceKind::I2c);

        let counts = ledger.counts();
        assert_eq!(counts.i2c, 1);
        assert_eq!(counts.spi, 1);
        assert_eq!(counts.uart, 0);
    }

    #[test]
    fn over_release_goes_negative() {
        let ledger = ResourceLedger::new();
        ledger.released(ResourceKind::HeapBlock);

        assert_eq!(ledger.counts().heap_allocations, -1);
    }

    #[test]
    fn min_free_keeps_lowest_sample() {
        let ledger = ResourceLedger::new();

        ledger.record_heap_free(20_000);
        ledger.record_heap_free(8_000);
        ledger.record_heap_free(12_000);
        ledger.record_stack_free(3_000);

        let counts = ledger.counts();
        assert_eq!(counts.heap_min_free, Some(8_000));
        assert_eq!(counts.stack_min_free, Some(3_000));
    }

    #[test]
    fn concurrent_updates_balance_out() {
        let ledger = Arc::new(ResourceLedger::new());
        let counter = shared(&ledger);

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        let guard = ResourceGuard::acquire(&counter, ResourceKind::OsObject);
                        drop(guard);
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(ledger.counts().os_objects, 0);
    }
}

mod audit {
    use super::*;

    #[test]
    fn fresh_ledger_is_clean_with_zero_baseline() {
        let report = ResourceLedger::new().audit(0, false);

        assert!(report.clean);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn os_baseline_must_match_exactly() {
        let ledger = ResourceLedger::new();
        ledger.acquired(ResourceKind::OsObject);

        assert!(ledger.audit(1, false).clean);

        let report = ledger.audit(0, false);
        assert!(!report.clean);
        assert_eq!(
            report.violations,
            vec![Violation::OsObjects {
                expected: 0,
                actual: 1
            }]
        );
    }

    #[test]
    fn fewer_os_objects_than_baseline_is_a_violation() {
        let report = ResourceLedger::new().audit(2, false);

        assert!(!report.clean);
        assert_eq!(report.violations[0].excess(), -2);
    }

    #[test]
    fn outstanding_heap_is_a_violation() {
        let ledger = ResourceLedger::new();
        ledger.acquired(ResourceKind::HeapBlock);

        let report = ledger.audit(0, false);
        assert_eq!(
            report.violations,
            vec![Violation::HeapAllocations { outstanding: 1 }]
        );
    }

    #[test]
    fn each_transport_is_itemized() {
        let ledger = ResourceLedger::new();
        ledger.acquired(ResourceKind::Uart);
        ledger.acquired(ResourceKind::Spi);
        ledger.acquired(ResourceKind::Spi);

        let report = ledger.audit(0, false);
        assert_eq!(
            report.violations,
            vec![
                Violation::TransportHandles {
                    kind: ResourceKind::Uart,
                    outstanding: 1
                },
                Violation::TransportHandles {
                    kind: ResourceKind::Spi,
                    outstanding: 2
                },
            ]
        );
    }

    #[test]
    fn low_heap_headroom_is_a_violation() {
        let ledger = ResourceLedger::with_thresholds(AuditThresholds {
            min_free_heap_bytes: 4096,
            min_free_stack_bytes: 512,
        });
        ledger.record_heap_free(4000);
        ledger.record_stack_free(600);

        let report = ledger.audit(0, false);
        assert_eq!(
            report.violations,
            vec![Violation::HeapHeadroom {
                min_free: 4000,
                required: 4096
            }]
        );
    }

    #[test]
    fn low_stack_headroom_is_a_violation() {
        let ledger = ResourceLedger::with_thresholds(AuditThresholds {
            min_free_heap_bytes: 0,
            min_free_stack_bytes: 1024,
        });
        ledger.record_stack_free(100);

        let report = ledger.audit(0, false);
        assert!(matches!(
            report.violations.as_slice(),
            [Violation::StackHeadroom {
                min_free: 100,
                required: 1024
            }]
        ));
    }

    #[test]
    fn headroom_exactly_at_threshold_is_clean() {
        let ledger = ResourceLedger::new();
        let thresholds = ledger.thresholds();
        ledger.record_heap_free(thresholds.min_free_heap_bytes);
        ledger.record_stack_free(thresholds.min_free_stack_bytes);

        assert!(ledger.audit(0, false).clean);
    }

    #[test]
    fn unsampled_headroom_is_skipped() {
        let ledger = ResourceLedger::with_thresholds(AuditThresholds {
            min_free_heap_bytes: u64::MAX - 1,
            min_free_stack_bytes: u64::MAX - 1,
        });

        assert!(ledger.audit(0, false).clean);
    }

    #[test]
    fn diagnostics_do_not_change_the_result() {
        let ledger = ResourceLedger::new();
        ledger.acquired(ResourceKind::Uart);
        ledger.record_heap_free(100_000);

        let quiet = ledger.audit(0, false);
        let loud = ledger.audit(0, true);

        assert_eq!(quiet, loud);
    }

    #[test]
    fn audit_has_no_side_effects() {
        let ledger = ResourceLedger::new();
        ledger.acquired(ResourceKind::HeapBlock);

        let before = ledger.counts();
        let _ = ledger.audit(0, true);

        assert_eq!(ledger.counts(), before);
    }
}
