//! Default audit thresholds.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Minimum number of heap bytes that must have stayed free at all times.
pub const MIN_FREE_HEAP_BYTES: u64 = 5 * 1024;

/// Minimum number of main-task stack bytes that must have stayed free.
pub const MIN_FREE_STACK_BYTES: u64 = 1024;

/// OS objects the network manager itself holds while it exists.
pub const MANAGER_OS_OBJECTS: i64 = 1;
