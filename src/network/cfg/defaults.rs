//! Schema versions and defaults for versioned configuration fields.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

use super::ConfigVersion;

/// Newest Wi-Fi schema version understood.
pub const WIFI_SCHEMA: ConfigVersion = ConfigVersion::new(1);

/// Newest cellular schema version understood.
pub const CELL_SCHEMA: ConfigVersion = ConfigVersion::new(2);

/// Newest BLE schema version understood.
pub const BLE_SCHEMA: ConfigVersion = ConfigVersion::new(1);

/// Newest GNSS schema version understood.
pub const GNSS_SCHEMA: ConfigVersion = ConfigVersion::new(1);

/// Default Wi-Fi association timeout in seconds.
pub const WIFI_CONNECT_TIMEOUT_SECS: u64 = 20;

/// Default cellular registration timeout in seconds.
pub const CELL_CONNECT_TIMEOUT_SECS: u64 = 180;

/// Default Wi-Fi association timeout as Duration.
#[must_use]
pub const fn wifi_connect_timeout() -> Duration {
    Duration::from_secs(WIFI_CONNECT_TIMEOUT_SECS)
}

/// Default cellular registration timeout as Duration.
#[must_use]
pub const fn cell_connect_timeout() -> Duration {
    Duration::from_secs(CELL_CONNECT_TIMEOUT_SECS)
}
