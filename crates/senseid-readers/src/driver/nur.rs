//! NUR UHF module driver boundary.

use crate::error::Result;
use crate::inventory::InventorySink;

/// Reader information block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NurReaderInfo {
    pub name: String,
    pub sw_ver_major: u8,
    pub sw_ver_minor: u8,
    pub num_antennas: usize,
}

/// Device capabilities relevant to tx power.
///
/// Power is set as an attenuation level: level 0 is `max_tx_dbm`, each level
/// removes `tx_attn_step` dB, down to `tx_steps` levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NurDeviceCaps {
    pub max_tx_dbm: f64,
    pub tx_steps: u32,
    pub tx_attn_step: f64,
}

impl NurDeviceCaps {
    /// Lowest reachable power in dBm.
    #[must_use]
    pub fn min_tx_dbm(&self) -> f64 {
        self.max_tx_dbm - f64::from(self.tx_steps) * self.tx_attn_step
    }

    /// Attenuation level closest to `dbm`, limited to the valid levels.
    #[must_use]
    pub fn level_for(&self, dbm: f64) -> u32 {
        if self.tx_attn_step <= 0.0 {
            return 0;
        }
        let level = ((self.max_tx_dbm - dbm) / self.tx_attn_step).round();
        if level <= 0.0 {
            0
        } else {
            (level as u32).min(self.tx_steps)
        }
    }

    /// Power in dBm produced by an attenuation level.
    #[must_use]
    pub fn dbm_for(&self, level: u32) -> f64 {
        self.max_tx_dbm - f64::from(level) * self.tx_attn_step
    }
}

/// Backscatter link frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFrequency {
    Blf160,
    Blf256,
    Blf320,
}

/// Receiver decoding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxDecoding {
    Fm0,
    Miller2,
    Miller4,
    Miller8,
}

/// Operations the NUR reader needs from the vendor API.
pub trait NurDriver: Send + 'static {
    fn connect_serial(&mut self, port: &str) -> Result<()>;
    fn disconnect(&mut self) -> Result<()>;

    fn reader_info(&mut self) -> Result<NurReaderInfo>;
    fn device_caps(&mut self) -> Result<NurDeviceCaps>;
    /// Name of the configured region.
    fn region(&mut self) -> Result<String>;

    fn set_link_profile(&mut self, link: LinkFrequency, rx: RxDecoding) -> Result<()>;

    /// Current attenuation level.
    fn tx_level(&mut self) -> Result<u32>;
    fn set_tx_level(&mut self, level: u32) -> Result<()>;

    fn antenna_config(&mut self) -> Result<Vec<bool>>;
    fn set_antenna_config(&mut self, config: &[bool]) -> Result<()>;

    /// Start the inventory stream. The driver restarts the stream by itself
    /// when the module stops it, until [`stop_inventory_stream`] is called.
    ///
    /// [`stop_inventory_stream`]: NurDriver::stop_inventory_stream
    fn start_inventory_stream(&mut self, sink: InventorySink) -> Result<()>;
    fn stop_inventory_stream(&mut self) -> Result<()>;
}
