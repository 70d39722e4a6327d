//! LLRP client boundary.

use crate::error::Result;
use crate::inventory::InventorySink;

/// Capabilities reported after the GET_READER_CAPABILITIES exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct LlrpCapabilities {
    pub model_name: String,
    pub firmware_version: String,
    pub max_antennas: usize,
    /// LLRP communications-standard code.
    pub communications_standard: u16,
    /// Transmit power table in dBm. Index 0 is reserved by LLRP.
    pub tx_power_table: Vec<f64>,
}

/// Communications-standard code table (LLRP `RegulatoryCapabilities`).
const COMMUNICATIONS_STANDARDS: &[(u16, &str)] = &[
    (0, "UNSPECIFIED"),
    (1, "US_FCC_Part_15_4W"),
    (2, "ETSI_302_208"),
    (3, "ETSI_300_220_500mW"),
    (4, "Australia_LIPD_1W"),
    (5, "Australia_LIPD_4W"),
    (6, "Japan_ARIB_STD_T89"),
    (7, "Hong_Kong_OFTA_1049_2W"),
    (8, "Taiwan_DGT_LP0002"),
    (9, "Korea_MIC_Article_5_2"),
    (10, "902_928MHz_4_W"),
    (11, "ETSI_302_208_Lower_Band_2W"),
    (12, "Brazil_Lower_Band_4W"),
    (13, "China_Lower_Band_2W"),
    (14, "China_Higher_Band_2W"),
    (15, "Hong_Kong_China_4W"),
    (16, "Israel_2W"),
    (17, "Japan_954_4W"),
    (18, "Japan_955_20mW"),
    (19, "865_868MHz_500mW"),
    (20, "Korea_4W"),
    (21, "Korea_200mW"),
    (23, "Malaysia_2W"),
    (24, "New_Zealand_Lower_Band_6W"),
    (25, "Singapore_500mW"),
    (26, "Singapore_2W"),
    (27, "South_Africa_4W_FHSS"),
    (28, "South_Africa_4W"),
    (29, "Taiwan_1W"),
    (30, "Taiwan_500mW"),
    (31, "Thailand_4W"),
    (32, "Venezuela_4W"),
    (33, "Vietnam_500mW"),
    (34, "Vietnam_2W"),
    (35, "Japan_4W"),
    (36, "Japan_500mW"),
    (37, "Brazil_Higher_Band_4W"),
    (38, "New_Zealand_Higher_Band_6W"),
];

/// Name of an LLRP communications-standard code.
#[must_use]
pub fn communications_standard_name(code: u16) -> Option<&'static str> {
    COMMUNICATIONS_STANDARDS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Operations the LLRP reader needs from the LLRP client.
pub trait LlrpDriver: Send + 'static {
    /// Open the LLRP connection and wait for the capabilities exchange.
    fn connect(&mut self, ip: &str) -> Result<()>;
    fn disconnect(&mut self) -> Result<()>;

    fn capabilities(&mut self) -> Result<LlrpCapabilities>;

    fn set_tx_power(&mut self, dbm: f64) -> Result<()>;
    fn set_antenna_config(&mut self, config: &[bool]) -> Result<()>;

    fn start_inventory(&mut self, sink: InventorySink) -> Result<()>;
    fn stop_inventory(&mut self) -> Result<()>;
}
