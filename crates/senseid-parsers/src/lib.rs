//! Tag payload decoders.
//!
//! Pure, stateless functions turning raw tag memory into [`TagRecord`]s:
//!
//! - [`ndef`]: NDEF URI records on NFC Type-5 tags, with best-effort
//!   extraction of the temperature/humidity pair encoded in the URI path.
//! - [`uint`]: fixed-width unsigned integer arrays (logger sample areas).
//! - [`rain`]: records for UHF (RAIN) inventory hits identified by EPC.
//!
//! Decoding never fails: malformed NDEF memory degrades to
//! [`TagRecord::unknown`].
//!
//! # Example
//!
//! ```
//! use senseid_parsers::ndef::decode_ndef;
//!
//! let mut memory = vec![0xE1, 0x40, 0x00, 0x00, 0x03, 0x0C, 0x91, 0x01, 0x08, 0x55, 0x03];
//! memory.extend_from_slice(b"a.b/1,2");
//!
//! let record = decode_ndef(&memory, Some("E0040150"));
//! assert_eq!(record.description, "http://a.b/1,2");
//! assert_eq!(record.measurements().len(), 2);
//! ```
//!
//! [`TagRecord`]: senseid_core::TagRecord
//! [`TagRecord::unknown`]: senseid_core::TagRecord::unknown

pub mod ndef;
pub mod rain;
pub mod uint;

pub use ndef::{decode_ndef, ndef_message_size, uri_prefix};
pub use rain::rain_tag;
pub use uint::{Endianness, UintWidth, decode_uints};

use std::fmt::Write;

/// Upper-case hex rendering of a tag identifier (UID or EPC).
///
/// ```
/// assert_eq!(senseid_parsers::hex_upper(&[0xe0, 0x04, 0x01]), "E00401");
/// ```
#[must_use]
pub fn hex_upper(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
            let _ = write!(s, "{b:02X}");
            s
        })
}
