//! Discovery configuration.

use senseid_core::constants::*;
use std::time::Duration;

/// Configuration of the transport scanners owned by a
/// [`DeviceRegistry`](crate::DeviceRegistry).
///
/// Transports whose cargo feature is disabled are skipped regardless of the
/// enable flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Interval between two enumerations of a polled transport, and between
    /// two attempts to reopen the mDNS browse.
    pub poll_interval: Duration,

    /// Scan USB serial ports.
    pub serial_enabled: bool,

    /// Scan the PC/SC reader list.
    pub pcsc_enabled: bool,

    /// Browse mDNS for network readers.
    pub mdns_enabled: bool,

    /// mDNS service type to browse.
    pub mdns_service_type: String,

    /// A resolved service is a reader if its name contains any of these.
    pub mdns_name_markers: Vec<String>,

    /// A PC/SC reader is an ACR1552 contactless slot if its name contains
    /// all of these.
    pub pcsc_name_markers: Vec<String>,

    /// Events buffered per registry subscriber before the slowest one lags.
    pub event_capacity: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            serial_enabled: true,
            pcsc_enabled: true,
            mdns_enabled: true,
            mdns_service_type: MDNS_SERVICE_TYPE.to_string(),
            mdns_name_markers: vec![SPEEDWAY_MDNS_MARKER.to_string()],
            pcsc_name_markers: ACR1552_PCSC_MARKERS.iter().map(|m| m.to_string()).collect(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
