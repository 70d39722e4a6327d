//! Octane SDK driver boundary (Impinj Speedway).

use crate::error::Result;
use crate::inventory::InventorySink;

/// Reader feature set.
#[derive(Debug, Clone, PartialEq)]
pub struct OctaneFeatureSet {
    pub model_name: String,
    pub communications_standard: String,
    pub firmware_version: String,
    pub antenna_count: usize,
    /// Supported tx power values in dBm, ascending.
    pub tx_powers: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OctaneReaderMode {
    MaxThroughput,
    Hybrid,
    DenseReaderM4,
    DenseReaderM8,
    AutoSetDenseReader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OctaneSearchMode {
    ReaderSelected,
    SingleTarget,
    DualTarget,
    TagFocus,
}

/// Operations the Octane reader needs from the vendor SDK.
pub trait OctaneDriver: Send + 'static {
    fn connect(&mut self, ip: &str) -> Result<()>;
    fn disconnect(&mut self) -> Result<()>;

    fn query_feature_set(&mut self) -> Result<OctaneFeatureSet>;
    fn set_mode(
        &mut self,
        reader_mode: OctaneReaderMode,
        search_mode: OctaneSearchMode,
        session: u8,
    ) -> Result<()>;

    fn tx_power(&mut self) -> Result<f64>;
    fn set_tx_power(&mut self, dbm: f64) -> Result<()>;

    fn antenna_config(&mut self) -> Result<Vec<bool>>;
    fn set_antenna_config(&mut self, config: &[bool]) -> Result<()>;

    fn start_inventory(&mut self, sink: InventorySink) -> Result<()>;
    fn stop_inventory(&mut self) -> Result<()>;
}
