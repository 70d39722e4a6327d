//! ACR1552 PC/SC driver boundary.

use crate::error::Result;

/// Operations the ACR1552 reader needs from the PC/SC driver.
///
/// Block operations address NFC Type-5 memory in 4-byte blocks.
pub trait Acr1552Driver: Send + 'static {
    /// Connect to the PC/SC reader with the given name.
    fn connect(&mut self, reader_name: &str) -> Result<()>;
    fn disconnect(&mut self) -> Result<()>;

    fn firmware_version(&mut self) -> Result<String>;

    /// Switch the RF field on or off.
    fn set_field(&mut self, on: bool) -> Result<()>;
    /// Switch the tag firmware between NDEF (`false`) and bulk (`true`) mode.
    fn set_bulk_mode(&mut self, bulk: bool) -> Result<()>;

    /// UID of the tag in the field, if any.
    fn uid(&mut self) -> Result<Option<Vec<u8>>>;

    fn read_blocks(&mut self, start_block: u16, n_blocks: u16) -> Result<Vec<u8>>;
    fn write_blocks(&mut self, start_block: u16, data: &[u8]) -> Result<()>;
}
