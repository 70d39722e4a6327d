//! UHF (RAIN) inventory records.

use crate::hex_upper;
use senseid_core::TagRecord;

/// Name given to UHF tags.
pub const RAIN_TAG_NAME: &str = "RAIN Tag";

/// Build the record reported for a UHF tag seen during inventory.
///
/// The id is the EPC in upper-case hex; UHF tags carry no sensor payload.
///
/// ```
/// use senseid_parsers::rain_tag;
///
/// let record = rain_tag(&[0xE2, 0x80, 0x11, 0x60]);
/// assert_eq!(record.id, "E2801160");
/// assert_eq!(record.description, "EPC E2801160");
/// ```
#[must_use]
pub fn rain_tag(epc: &[u8]) -> TagRecord {
    let id = hex_upper(epc);
    TagRecord {
        description: format!("EPC {id}"),
        id,
        name: RAIN_TAG_NAME.to_string(),
        data: None,
    }
}
