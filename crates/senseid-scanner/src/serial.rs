//! USB serial port discovery.
//!
//! Ports are recognised by hardware signature: the USB vendor/product pair
//! or a marker in the USB serial number. Every matching signature
//! contributes a descriptor, so a port behind a bridge chip shared by two
//! reader families is reported once per family.

use crate::presence::Observation;
use senseid_core::constants::*;
use senseid_core::{DeviceDescriptor, SupportedReader};

/// What the OS reports about one serial port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortInfo {
    /// Port name, used as the connection address.
    pub name: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
}

impl PortInfo {
    /// A USB port with the given identifiers.
    pub fn usb(name: impl Into<String>, vid: u16, pid: u16) -> Self {
        Self {
            name: name.into(),
            vid: Some(vid),
            pid: Some(pid),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }
}

/// Hardware signature of a reader family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSignature {
    /// USB vendor/product pair.
    UsbId { vid: u16, pid: u16 },
    /// Substring of the USB serial number.
    SerialNumber(&'static str),
}

impl PortSignature {
    pub fn matches(&self, port: &PortInfo) -> bool {
        match self {
            Self::UsbId { vid, pid } => port.vid == Some(*vid) && port.pid == Some(*pid),
            Self::SerialNumber(marker) => port
                .serial_number
                .as_deref()
                .is_some_and(|serial| serial.contains(marker)),
        }
    }
}

/// Known serial reader signatures.
pub const SERIAL_SIGNATURES: [(PortSignature, SupportedReader); 3] = [
    (
        PortSignature::UsbId {
            vid: NUR_USB_VID,
            pid: NUR_USB_PID,
        },
        SupportedReader::Nur,
    ),
    (
        PortSignature::SerialNumber(KLSBLELCR_SERIAL_MARKER),
        SupportedReader::KlSbleLcr,
    ),
    (
        PortSignature::UsbId {
            vid: CP210X_USB_VID,
            pid: CP210X_USB_PID,
        },
        SupportedReader::Red4s,
    ),
];

/// Reader kinds whose signature matches `port`.
pub fn match_port(port: &PortInfo) -> Vec<SupportedReader> {
    SERIAL_SIGNATURES
        .iter()
        .filter(|(signature, _)| signature.matches(port))
        .map(|(_, kind)| *kind)
        .collect()
}

/// Observation of a port listing. Unrecognised ports are left out.
pub fn serial_observation(ports: &[PortInfo]) -> Observation {
    let mut observation = Observation::new();
    for port in ports {
        let kinds = match_port(port);
        if kinds.is_empty() {
            continue;
        }
        let descriptors = observation.entry(port.name.clone()).or_default();
        for kind in kinds {
            let descriptor = DeviceDescriptor::new(kind, &port.name);
            if !descriptors.contains(&descriptor) {
                descriptors.push(descriptor);
            }
        }
    }
    observation
}

#[cfg(feature = "serial")]
mod system {
    use super::{PortInfo, serial_observation};
    use crate::error::{Result, ScanError};
    use crate::presence::Observation;
    use crate::scanner::PresenceSource;
    use serialport::SerialPortType;
    use tracing::trace;

    /// Serial ports enumerated through the OS.
    #[derive(Debug, Default)]
    pub struct SerialPortSource;

    impl SerialPortSource {
        pub fn new() -> Self {
            Self
        }
    }

    impl PresenceSource for SerialPortSource {
        fn transport(&self) -> &'static str {
            "serial"
        }

        fn observe(&mut self) -> Result<Observation> {
            let ports = serialport::available_ports()
                .map_err(|e| ScanError::unavailable("serial", e.to_string()))?;

            let ports: Vec<PortInfo> = ports
                .into_iter()
                .map(|port| match port.port_type {
                    SerialPortType::UsbPort(usb) => PortInfo {
                        name: port.port_name,
                        vid: Some(usb.vid),
                        pid: Some(usb.pid),
                        serial_number: usb.serial_number,
                        manufacturer: usb.manufacturer,
                    },
                    _ => PortInfo {
                        name: port.port_name,
                        ..PortInfo::default()
                    },
                })
                .collect();
            trace!("Serial ports: {:?}", ports);
            Ok(serial_observation(&ports))
        }
    }
}

#[cfg(feature = "serial")]
pub use system::SerialPortSource;
