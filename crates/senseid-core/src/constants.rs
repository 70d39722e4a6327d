//! Shared constants for reader discovery, reader control and tag decoding.
//!
//! Constants are grouped by the layer that consumes them. Values that identify
//! vendor hardware (USB identifiers, advertised name markers) are matched
//! verbatim against what the operating system or the network reports.
//!
//! # Usage
//!
//! ```
//! use senseid_core::constants::*;
//! use std::time::Duration;
//!
//! let poll = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
//! assert_eq!(poll, Duration::from_secs(1));
//!
//! assert_eq!(NDEF_CC_MAGIC, [0xE1, 0x40]);
//! ```

// ============================================================================
// Discovery
// ============================================================================

/// Interval between two enumerations of a polled transport (serial, PC/SC).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Capacity of the registry event queue kept for each subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// USB vendor/product of the NUR UHF modules (Nordic ID).
pub const NUR_USB_VID: u16 = 0x04E6;
/// See [`NUR_USB_VID`].
pub const NUR_USB_PID: u16 = 0x0112;

/// USB vendor/product of the CP210x USB-UART bridge used by RED4S readers.
pub const CP210X_USB_VID: u16 = 0x10C4;
/// See [`CP210X_USB_VID`].
pub const CP210X_USB_PID: u16 = 0xEA60;

/// Marker carried in the USB serial number of KL-SBLE-LCR loggers.
pub const KLSBLELCR_SERIAL_MARKER: &str = "KL-SBLE-LCR";

/// PC/SC reader-name markers; all of them must be present.
///
/// The ACR1552 exposes a SAM slot and a contactless (PICC) slot; only the
/// latter talks to tags.
pub const ACR1552_PCSC_MARKERS: [&str; 2] = ["ACR1552", "PICC"];

/// mDNS service type browsed for network readers.
pub const MDNS_SERVICE_TYPE: &str = "_http._tcp.local.";

/// Advertised service-name marker of Impinj Speedway readers.
pub const SPEEDWAY_MDNS_MARKER: &str = "SpeedwayR";

// ============================================================================
// Readers
// ============================================================================

/// Interval between two UID polls during NFC inventory.
pub const NFC_INVENTORY_POLL_MS: u64 = 250;

// ============================================================================
// NFC tag layout (NTAG 5)
// ============================================================================

/// Size of one NFC Type-5 memory block in bytes.
pub const NFC_BLOCK_SIZE: usize = 4;

/// Capability-container magic bytes at the start of tag memory.
pub const NDEF_CC_MAGIC: [u8; 2] = [0xE1, 0x40];

/// TLV type of an NDEF message.
pub const NDEF_MESSAGE_TLV: u8 = 0x03;

/// TLV terminator.
pub const NDEF_TERMINATOR_TLV: u8 = 0xFE;

/// NDEF well-known record type `U` (URI).
pub const NDEF_URI_RECORD_TYPE: u8 = 0x55;

/// Bytes preceding the NDEF message: CC (4) + TLV type (1) + TLV length (1).
pub const NDEF_HEADER_LEN: usize = 6;

/// First block of the NDEF area.
pub const NTAG5_NDEF_BASE_BLOCK: u16 = 0;
/// Blocks holding the CC and the NDEF TLV header.
pub const NTAG5_NDEF_HEADER_NBLOCKS: u16 = 2;

/// Block holding the logger write index (bulk firmware mode).
pub const NTAG5_IDX_BLOCK: u16 = 50;
/// See [`NTAG5_IDX_BLOCK`].
pub const NTAG5_IDX_NBLOCKS: u16 = 1;

/// First block of the logger sample area (bulk firmware mode).
pub const NTAG5_DATA_BASE_BLOCK: u16 = 0;
/// Blocks in the logger sample area.
pub const NTAG5_DATA_NBLOCKS: u16 = 50;
