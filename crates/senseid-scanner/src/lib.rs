//! Multi-transport discovery of RFID/NFC readers.
//!
//! Each transport is watched by its own scanner: USB serial ports and the
//! PC/SC reader list are polled, network readers are discovered through an
//! mDNS browse. Scanners report presence *transitions* only, and the
//! [`DeviceRegistry`] reconciles them into one deduplicated set of
//! [`DeviceDescriptor`](senseid_core::DeviceDescriptor)s.
//!
//! # Features
//!
//! - `serial` (default): USB serial port enumeration through `serialport`.
//! - `mdns` (default): mDNS browse through `mdns-sd`.
//! - `pcsc`: PC/SC reader list through `pcsc`. Links the system PC/SC
//!   library.
//!
//! The scripted scanners in [`mock`] and [`mdns`] are always available.

pub mod config;
pub mod error;
pub mod mdns;
pub mod mock;
pub mod pcsc;
pub mod presence;
pub mod registry;
pub mod scanner;
pub mod serial;
pub mod sink;

pub use config::ScannerConfig;
pub use error::{Result, ScanError};
pub use presence::{Observation, PresenceSet, Transitions};
pub use registry::{DeviceRegistry, RegistryEntry, RegistryEvent};
pub use scanner::{AnyTransportScanner, PollingScanner, PresenceSource, TransportScanner};
pub use sink::{DeviceSink, SharedSink};
