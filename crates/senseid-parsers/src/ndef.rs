//! NDEF URI record decoding.
//!
//! NFC Type-5 sensor tags publish their reading as a single NDEF URI record.
//! The memory image read from block 0 looks like this:
//!
//! ```text
//! offset  0  1  2  3  4  5  6  7  8  9  10    11 ..
//!        E1 40 xx xx 03 LL HH 01 PP 55 CODE  URI body .. FE
//!        \_ CC _____/ \TLV/ \__ record header _/
//! ```
//!
//! - `E1 40`: capability-container magic.
//! - `03 LL`: NDEF message TLV and its length (bytes after offset 5).
//! - `HH`: record header flags (`0x91`/`0xD1`), `01`: type length.
//! - `PP`: payload length, counting the identifier code byte.
//! - `55`: well-known type `U`.
//! - `CODE`: URI identifier code, expanded through [`uri_prefix`].
//!
//! Sensor tags append their reading to the URI path as `/<temp>,<hum>` with
//! both values scaled by 100. That extraction is best-effort: a URI that does
//! not carry a reading still produces a valid record, only without
//! measurements.
//!
//! # Examples
//!
//! ```
//! use senseid_parsers::ndef::decode_ndef;
//!
//! let body = b"192.168.1.5/2350,4500";
//! let mut memory = vec![0xE1, 0x40, 0x10, 0x00, 0x03, (body.len() + 5) as u8];
//! memory.extend_from_slice(&[0x91, 0x01, (body.len() + 1) as u8, 0x55, 0x01]);
//! memory.extend_from_slice(body);
//! memory.push(0xFE);
//!
//! let record = decode_ndef(&memory, Some("E0040150A1B2C3D4"));
//! assert_eq!(record.description, "http://www.192.168.1.5/2350,4500");
//! assert_eq!(record.measurements()[0].value, 23.5);
//! assert_eq!(record.measurements()[1].value, 45.0);
//! ```

use senseid_core::{Measurement, TagRecord, constants::*};
use tracing::debug;

/// Smallest memory image that can hold a URI record header.
pub const MIN_NDEF_URI_LEN: usize = 11;

/// Name given to successfully decoded NDEF tags.
pub const NDEF_TAG_NAME: &str = "NFC NDEF Tag";

const TLV_TYPE_OFFSET: usize = 4;
const TLV_LENGTH_OFFSET: usize = 5;
const PAYLOAD_LENGTH_OFFSET: usize = 8;
const RECORD_TYPE_OFFSET: usize = 9;
const URI_CODE_OFFSET: usize = 10;
const URI_BODY_OFFSET: usize = 11;

/// URI identifier codes `0x00`-`0x23` (NFC Forum URI RTD).
const URI_PREFIXES: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// Expand a URI identifier code. Unknown codes expand to nothing.
#[must_use]
pub fn uri_prefix(code: u8) -> &'static str {
    URI_PREFIXES.get(usize::from(code)).copied().unwrap_or("")
}

/// Total size in bytes of the NDEF area described by a CC + TLV header.
///
/// Returns `None` when the header is shorter than 6 bytes, the CC magic is
/// wrong or the first TLV is not an NDEF message.
#[must_use]
pub fn ndef_message_size(header: &[u8]) -> Option<usize> {
    if header.len() < NDEF_HEADER_LEN
        || header[..2] != NDEF_CC_MAGIC
        || header[TLV_TYPE_OFFSET] != NDEF_MESSAGE_TLV
    {
        return None;
    }
    Some(NDEF_HEADER_LEN + usize::from(header[TLV_LENGTH_OFFSET]))
}

/// Decode an NDEF URI record from raw tag memory.
///
/// Never fails: memory that does not hold a URI record yields
/// [`TagRecord::unknown`] with the UID preserved.
pub fn decode_ndef(data: &[u8], uid: Option<&str>) -> TagRecord {
    let (code, body) = match parse_uri_record(data) {
        Ok(parts) => parts,
        Err(reason) => {
            debug!("Undecodable NDEF memory ({} bytes): {}", data.len(), reason);
            return TagRecord::unknown(uid);
        }
    };

    let body: String = body
        .iter()
        .filter(|&&b| b != NDEF_TERMINATOR_TLV && b != 0x00)
        .map(|&b| char::from(b))
        .collect();

    let record = TagRecord {
        id: uid.unwrap_or_default().to_string(),
        name: NDEF_TAG_NAME.to_string(),
        description: format!("{}{}", uri_prefix(code), body),
        data: parse_sensor_data(&body),
    };
    debug!("Decoded NDEF record: {:?}", record);
    record
}

/// Validate the structure and return the identifier code and URI body bytes.
fn parse_uri_record(data: &[u8]) -> Result<(u8, &[u8]), String> {
    if data.len() < MIN_NDEF_URI_LEN {
        return Err(format!("too short: {} bytes", data.len()));
    }
    if data[..2] != NDEF_CC_MAGIC {
        return Err(format!("invalid CC: {:02X} {:02X}", data[0], data[1]));
    }
    if data[TLV_TYPE_OFFSET] != NDEF_MESSAGE_TLV {
        return Err(format!("invalid NDEF TLV: {:02X}", data[TLV_TYPE_OFFSET]));
    }
    if data[RECORD_TYPE_OFFSET] != NDEF_URI_RECORD_TYPE {
        return Err(format!(
            "record type is not URI: {:02X}",
            data[RECORD_TYPE_OFFSET]
        ));
    }

    // Payload length counts the identifier code byte.
    let payload_length = usize::from(data[PAYLOAD_LENGTH_OFFSET]);
    let message_end = NDEF_HEADER_LEN + usize::from(data[TLV_LENGTH_OFFSET]);
    let end = (URI_CODE_OFFSET + payload_length)
        .min(message_end)
        .min(data.len())
        .max(URI_BODY_OFFSET);

    Ok((data[URI_CODE_OFFSET], &data[URI_BODY_OFFSET..end]))
}

/// Extract `<temp>,<hum>` from the last path segment of a URI body.
fn parse_sensor_data(body: &str) -> Option<Vec<Measurement>> {
    let (_, segment) = body.rsplit_once('/')?;
    let (temperature, humidity) = segment.split_once(',')?;

    let parse = |field: &str| match field.trim().parse::<i64>() {
        Ok(value) => Some(value as f64 / 100.0),
        Err(e) => {
            debug!("Sensor field {:?} is not an integer: {}", field, e);
            None
        }
    };
    if humidity.contains(',') {
        debug!("Sensor segment {:?} has more than two fields", segment);
        return None;
    }

    Some(vec![
        Measurement::new("Temperature", parse(temperature)?, "°C", "Celsius"),
        Measurement::new("Humidity", parse(humidity)?, "%", "Percent"),
    ])
}
