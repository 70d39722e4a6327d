//! RED RCP driver boundary (Phychips RED4S).

use crate::error::Result;
use crate::inventory::InventorySink;

/// Detail block reported by the module.
#[derive(Debug, Clone, PartialEq)]
pub struct RedInfoDetail {
    pub region: String,
    pub min_tx_power: f64,
    pub max_tx_power: f64,
}

/// Operations the RED4S reader needs from the RCP driver.
pub trait RedDriver: Send + 'static {
    fn connect(&mut self, port: &str) -> Result<()>;
    fn disconnect(&mut self) -> Result<()>;
    fn is_connected(&self) -> bool;

    fn model(&mut self) -> Result<String>;
    fn firmware_version(&mut self) -> Result<String>;
    fn detail(&mut self) -> Result<RedInfoDetail>;

    fn tx_power(&mut self) -> Result<f64>;
    fn set_tx_power(&mut self, dbm: f64) -> Result<()>;

    /// Start automatic read mode, reporting every tag to `sink`.
    fn start_auto_read(&mut self, sink: InventorySink) -> Result<()>;
    fn stop_auto_read(&mut self) -> Result<()>;
}
