use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported reader kinds.
///
/// The set is closed: one variant per vendor or class of reader that the
/// discovery layer can recognise. The serialized form is the literal name
/// returned by [`SupportedReader::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SupportedReader {
    /// Phychips RED4S UHF reader (USB serial).
    #[serde(rename = "RED4S")]
    Red4s,

    /// Nordic ID NUR UHF module (USB serial).
    #[serde(rename = "NUR")]
    Nur,

    /// Impinj Speedway driven through the Octane SDK surface (IP).
    #[serde(rename = "OCTANE")]
    Octane,

    /// Reader driven through plain LLRP (IP).
    #[serde(rename = "LLRP")]
    Llrp,

    /// ACS ACR1552 NFC reader (PC/SC).
    #[serde(rename = "ACR1552")]
    Acr1552,

    /// KL-SBLE-LCR sensor logger (USB serial).
    #[serde(rename = "KLSBLELCR")]
    KlSbleLcr,
}

impl SupportedReader {
    /// Every supported kind, in declaration order.
    pub const ALL: [SupportedReader; 6] = [
        Self::Red4s,
        Self::Nur,
        Self::Octane,
        Self::Llrp,
        Self::Acr1552,
        Self::KlSbleLcr,
    ];

    /// Literal name of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red4s => "RED4S",
            Self::Nur => "NUR",
            Self::Octane => "OCTANE",
            Self::Llrp => "LLRP",
            Self::Acr1552 => "ACR1552",
            Self::KlSbleLcr => "KLSBLELCR",
        }
    }

    /// Physical transport the kind is discovered and reached through.
    #[must_use]
    pub fn transport(&self) -> Transport {
        match self {
            Self::Red4s | Self::Nur | Self::KlSbleLcr => Transport::Serial,
            Self::Octane | Self::Llrp => Transport::Network,
            Self::Acr1552 => Transport::SmartCard,
        }
    }
}

impl fmt::Display for SupportedReader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SupportedReader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownReaderKind(s.to_string()))
    }
}

/// Names of all supported reader kinds.
#[must_use]
pub fn supported_readers() -> Vec<&'static str> {
    SupportedReader::ALL.iter().map(|kind| kind.as_str()).collect()
}

/// Physical transport a reader is attached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    /// USB serial port.
    Serial,
    /// PC/SC smart-card subsystem.
    SmartCard,
    /// IP network.
    Network,
}

/// Identity of a discovered reader.
///
/// A descriptor is the pair `(kind, address)` where the address is specific
/// to the transport: a serial port name, a PC/SC reader name or a dotted IPv4
/// address. Descriptors are immutable; two descriptors are equal iff both
/// fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    kind: SupportedReader,
    address: String,
}

impl DeviceDescriptor {
    /// Create a new descriptor.
    pub fn new(kind: SupportedReader, address: impl Into<String>) -> Self {
        Self {
            kind,
            address: address.into(),
        }
    }

    /// Reader kind.
    #[must_use]
    pub fn kind(&self) -> SupportedReader {
        self.kind
    }

    /// Transport-specific connection address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Transport the descriptor was discovered on.
    #[must_use]
    pub fn transport(&self) -> Transport {
        self.kind.transport()
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.address)
    }
}

/// Static facts reported by a connected reader.
///
/// Fetched once per session and cached by the reader implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderDetails {
    /// Model name.
    pub model_name: String,

    /// Region or regulatory domain name.
    pub region: String,

    /// Firmware version string.
    pub firmware_version: String,

    /// Number of antenna ports.
    pub antenna_count: usize,

    /// Lowest transmit power in dBm.
    pub min_tx_power: f64,

    /// Highest transmit power in dBm.
    pub max_tx_power: f64,
}

impl ReaderDetails {
    /// Transmit power envelope as `(min, max)` in dBm.
    #[must_use]
    pub fn tx_power_range(&self) -> (f64, f64) {
        (self.min_tx_power, self.max_tx_power)
    }
}

/// One decoded sensor value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Physical magnitude (e.g. "Temperature").
    pub magnitude: String,

    /// Numeric value.
    pub value: f64,

    /// Unit symbol (e.g. "°C").
    pub unit_short: String,

    /// Unit name (e.g. "Celsius").
    pub unit_long: String,
}

impl Measurement {
    /// Create a new measurement.
    pub fn new(
        magnitude: impl Into<String>,
        value: f64,
        unit_short: impl Into<String>,
        unit_long: impl Into<String>,
    ) -> Self {
        Self {
            magnitude: magnitude.into(),
            value,
            unit_short: unit_short.into(),
            unit_long: unit_long.into(),
        }
    }
}

/// Decoded tag identity and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Tag identifier (hex UID or EPC).
    pub id: String,

    /// Short name.
    pub name: String,

    /// Free-text description.
    pub description: String,

    /// Sensor samples, absent when no sensor payload could be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Measurement>>,
}

impl TagRecord {
    /// Name given to NFC tags whose memory could not be decoded.
    pub const UNKNOWN_NAME: &'static str = "NFC Tag";

    /// Description given to NFC tags whose memory could not be decoded.
    pub const UNKNOWN_DESCRIPTION: &'static str = "Unknown";

    /// Record for a tag whose payload failed validation.
    ///
    /// The UID is preserved when known; there are no measurements.
    pub fn unknown(uid: Option<&str>) -> Self {
        Self {
            id: uid.unwrap_or_default().to_string(),
            name: Self::UNKNOWN_NAME.to_string(),
            description: Self::UNKNOWN_DESCRIPTION.to_string(),
            data: None,
        }
    }

    /// Whether this is the fallback record produced for undecodable memory.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.data.is_none()
            && self.name == Self::UNKNOWN_NAME
            && self.description == Self::UNKNOWN_DESCRIPTION
    }

    /// Measurements carried by the record; empty when absent.
    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        self.data.as_deref().unwrap_or_default()
    }
}
