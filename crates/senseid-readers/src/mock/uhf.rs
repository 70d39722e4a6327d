//! Simulated UHF drivers (NUR, Octane, RED4S, LLRP).
//!
//! All four share one state shape, inspected and driven through a
//! [`UhfHandle`]: whether the device answers, the settings last applied and
//! the inventory sink, so tests can inject tag reports.

use crate::driver::{
    LinkFrequency, LlrpCapabilities, LlrpDriver, NurDeviceCaps, NurDriver, NurReaderInfo,
    OctaneDriver, OctaneFeatureSet, OctaneReaderMode, OctaneSearchMode, RedDriver, RedInfoDetail,
    RxDecoding,
};
use crate::error::{HardwareError, Result};
use crate::inventory::InventorySink;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct UhfState {
    reachable: bool,
    connected: bool,
    address: Option<String>,
    tx_dbm: f64,
    tx_level: u32,
    antennas: Vec<bool>,
    link_profile: Option<(LinkFrequency, RxDecoding)>,
    reader_mode: Option<(OctaneReaderMode, OctaneSearchMode, u8)>,
    inventory: Option<InventorySink>,
}

#[derive(Debug, Clone)]
struct SharedState(Arc<Mutex<UhfState>>);

impl SharedState {
    fn new(tx_dbm: f64, antenna_count: usize) -> Self {
        Self(Arc::new(Mutex::new(UhfState {
            reachable: true,
            connected: false,
            address: None,
            tx_dbm,
            tx_level: 0,
            antennas: vec![true; antenna_count],
            link_profile: None,
            reader_mode: None,
            inventory: None,
        })))
    }

    fn lock(&self) -> MutexGuard<'_, UhfState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn connect(&self, address: &str) -> Result<()> {
        let mut state = self.lock();
        if !state.reachable {
            return Err(HardwareError::communication(format!(
                "no response from {address}"
            )));
        }
        state.connected = true;
        state.address = Some(address.to_string());
        Ok(())
    }

    fn disconnect(&self) -> Result<()> {
        let mut state = self.lock();
        state.connected = false;
        state.inventory = None;
        Ok(())
    }

    /// Lock the state of a connected device.
    fn session(&self) -> Result<MutexGuard<'_, UhfState>> {
        let state = self.lock();
        if state.connected {
            Ok(state)
        } else {
            Err(HardwareError::communication("device not connected"))
        }
    }
}

/// Control and inspection handle of a simulated UHF reader.
#[derive(Debug, Clone)]
pub struct UhfHandle {
    state: SharedState,
}

impl UhfHandle {
    /// Make the device answer (or not) to connection attempts.
    pub fn set_reachable(&self, reachable: bool) {
        self.state.lock().reachable = reachable;
    }

    /// Simulate the device going away: the session drops.
    pub fn unplug(&self) {
        let mut state = self.state.lock();
        state.reachable = false;
        state.connected = false;
        state.inventory = None;
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    /// Address of the last successful connection.
    pub fn address(&self) -> Option<String> {
        self.state.lock().address.clone()
    }

    /// Power last applied in dBm (Octane, RED4S, LLRP).
    pub fn tx_dbm(&self) -> f64 {
        self.state.lock().tx_dbm
    }

    /// Attenuation level last applied (NUR).
    pub fn tx_level(&self) -> u32 {
        self.state.lock().tx_level
    }

    pub fn antennas(&self) -> Vec<bool> {
        self.state.lock().antennas.clone()
    }

    pub fn link_profile(&self) -> Option<(LinkFrequency, RxDecoding)> {
        self.state.lock().link_profile
    }

    pub fn reader_mode(&self) -> Option<(OctaneReaderMode, OctaneSearchMode, u8)> {
        self.state.lock().reader_mode
    }

    pub fn inventory_running(&self) -> bool {
        self.state.lock().inventory.is_some()
    }

    /// Report a tag as if the reader had just seen it.
    ///
    /// Returns `false` when inventory is not running or the record was dropped.
    pub fn report_epc(&self, epc: &[u8]) -> bool {
        let sink = self.state.lock().inventory.clone();
        sink.is_some_and(|sink| sink.report_epc(epc))
    }
}

fn start_inventory(state: &SharedState, sink: InventorySink) -> Result<()> {
    state.session()?.inventory = Some(sink);
    Ok(())
}

fn stop_inventory(state: &SharedState) -> Result<()> {
    state.session()?.inventory = None;
    Ok(())
}

// ============================================================================
// NUR
// ============================================================================

/// Simulated NUR module.
#[derive(Debug, Clone)]
pub struct SimulatedNur {
    state: SharedState,
    info: NurReaderInfo,
    caps: NurDeviceCaps,
    region: String,
}

impl SimulatedNur {
    /// NUR-10W: 4 antennas, 8 to 27 dBm in 1 dB steps.
    pub fn new() -> (Self, UhfHandle) {
        Self::with_caps(NurDeviceCaps {
            max_tx_dbm: 27.0,
            tx_steps: 19,
            tx_attn_step: 1.0,
        })
    }

    pub fn with_caps(caps: NurDeviceCaps) -> (Self, UhfHandle) {
        let info = NurReaderInfo {
            name: "NUR-10W".to_string(),
            sw_ver_major: 5,
            sw_ver_minor: 11,
            num_antennas: 4,
        };
        let state = SharedState::new(caps.max_tx_dbm, info.num_antennas);
        let handle = UhfHandle {
            state: state.clone(),
        };
        let driver = Self {
            state,
            info,
            caps,
            region: "EU".to_string(),
        };
        (driver, handle)
    }
}

impl NurDriver for SimulatedNur {
    fn connect_serial(&mut self, port: &str) -> Result<()> {
        self.state.connect(port)
    }

    fn disconnect(&mut self) -> Result<()> {
        self.state.disconnect()
    }

    fn reader_info(&mut self) -> Result<NurReaderInfo> {
        self.state.session()?;
        Ok(self.info.clone())
    }

    fn device_caps(&mut self) -> Result<NurDeviceCaps> {
        self.state.session()?;
        Ok(self.caps)
    }

    fn region(&mut self) -> Result<String> {
        self.state.session()?;
        Ok(self.region.clone())
    }

    fn set_link_profile(&mut self, link: LinkFrequency, rx: RxDecoding) -> Result<()> {
        self.state.session()?.link_profile = Some((link, rx));
        Ok(())
    }

    fn tx_level(&mut self) -> Result<u32> {
        Ok(self.state.session()?.tx_level)
    }

    fn set_tx_level(&mut self, level: u32) -> Result<()> {
        if level > self.caps.tx_steps {
            return Err(HardwareError::invalid_data(format!(
                "tx level {level} out of range"
            )));
        }
        let mut state = self.state.session()?;
        state.tx_level = level;
        state.tx_dbm = self.caps.dbm_for(level);
        Ok(())
    }

    fn antenna_config(&mut self) -> Result<Vec<bool>> {
        Ok(self.state.session()?.antennas.clone())
    }

    fn set_antenna_config(&mut self, config: &[bool]) -> Result<()> {
        self.state.session()?.antennas = config.to_vec();
        Ok(())
    }

    fn start_inventory_stream(&mut self, sink: InventorySink) -> Result<()> {
        start_inventory(&self.state, sink)
    }

    fn stop_inventory_stream(&mut self) -> Result<()> {
        stop_inventory(&self.state)
    }
}

// ============================================================================
// Octane
// ============================================================================

/// Power table from `min` to `max` in quarter-dB steps.
fn quarter_db_table(min: f64, max: f64) -> Vec<f64> {
    let steps = ((max - min) * 4.0).round() as usize;
    (0..=steps).map(|i| min + i as f64 * 0.25).collect()
}

/// Simulated Speedway reader behind the Octane SDK.
#[derive(Debug, Clone)]
pub struct SimulatedOctane {
    state: SharedState,
    features: OctaneFeatureSet,
}

impl SimulatedOctane {
    /// Speedway R420: 4 antennas, 10 to 32.5 dBm.
    pub fn new() -> (Self, UhfHandle) {
        Self::with_tx_powers(quarter_db_table(10.0, 32.5))
    }

    pub fn with_tx_powers(tx_powers: Vec<f64>) -> (Self, UhfHandle) {
        let features = OctaneFeatureSet {
            model_name: "Speedway R420".to_string(),
            communications_standard: "ETSI_302_208".to_string(),
            firmware_version: "7.5.0.181".to_string(),
            antenna_count: 4,
            tx_powers,
        };
        let initial = features.tx_powers.last().copied().unwrap_or_default();
        let state = SharedState::new(initial, features.antenna_count);
        let handle = UhfHandle {
            state: state.clone(),
        };
        (Self { state, features }, handle)
    }
}

impl OctaneDriver for SimulatedOctane {
    fn connect(&mut self, ip: &str) -> Result<()> {
        self.state.connect(ip)
    }

    fn disconnect(&mut self) -> Result<()> {
        self.state.disconnect()
    }

    fn query_feature_set(&mut self) -> Result<OctaneFeatureSet> {
        self.state.session()?;
        Ok(self.features.clone())
    }

    fn set_mode(
        &mut self,
        reader_mode: OctaneReaderMode,
        search_mode: OctaneSearchMode,
        session: u8,
    ) -> Result<()> {
        self.state.session()?.reader_mode = Some((reader_mode, search_mode, session));
        Ok(())
    }

    fn tx_power(&mut self) -> Result<f64> {
        Ok(self.state.session()?.tx_dbm)
    }

    fn set_tx_power(&mut self, dbm: f64) -> Result<()> {
        self.state.session()?.tx_dbm = dbm;
        Ok(())
    }

    fn antenna_config(&mut self) -> Result<Vec<bool>> {
        Ok(self.state.session()?.antennas.clone())
    }

    fn set_antenna_config(&mut self, config: &[bool]) -> Result<()> {
        self.state.session()?.antennas = config.to_vec();
        Ok(())
    }

    fn start_inventory(&mut self, sink: InventorySink) -> Result<()> {
        start_inventory(&self.state, sink)
    }

    fn stop_inventory(&mut self) -> Result<()> {
        stop_inventory(&self.state)
    }
}

// ============================================================================
// RED4S
// ============================================================================

/// Simulated RED4S module.
#[derive(Debug, Clone)]
pub struct SimulatedRed {
    state: SharedState,
    detail: RedInfoDetail,
}

impl SimulatedRed {
    /// RED4S: single antenna, 13 to 25 dBm.
    pub fn new() -> (Self, UhfHandle) {
        Self::with_tx_range(13.0, 25.0)
    }

    pub fn with_tx_range(min_tx_power: f64, max_tx_power: f64) -> (Self, UhfHandle) {
        let detail = RedInfoDetail {
            region: "EU".to_string(),
            min_tx_power,
            max_tx_power,
        };
        let state = SharedState::new(max_tx_power, 1);
        let handle = UhfHandle {
            state: state.clone(),
        };
        (Self { state, detail }, handle)
    }
}

impl RedDriver for SimulatedRed {
    fn connect(&mut self, port: &str) -> Result<()> {
        self.state.connect(port)
    }

    fn disconnect(&mut self) -> Result<()> {
        self.state.disconnect()
    }

    fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    fn model(&mut self) -> Result<String> {
        self.state.session()?;
        Ok("RED4S".to_string())
    }

    fn firmware_version(&mut self) -> Result<String> {
        self.state.session()?;
        Ok("2.1.3".to_string())
    }

    fn detail(&mut self) -> Result<RedInfoDetail> {
        self.state.session()?;
        Ok(self.detail.clone())
    }

    fn tx_power(&mut self) -> Result<f64> {
        Ok(self.state.session()?.tx_dbm)
    }

    fn set_tx_power(&mut self, dbm: f64) -> Result<()> {
        self.state.session()?.tx_dbm = dbm;
        Ok(())
    }

    fn start_auto_read(&mut self, sink: InventorySink) -> Result<()> {
        start_inventory(&self.state, sink)
    }

    fn stop_auto_read(&mut self) -> Result<()> {
        stop_inventory(&self.state)
    }
}

// ============================================================================
// LLRP
// ============================================================================

/// Simulated LLRP reader.
#[derive(Debug, Clone)]
pub struct SimulatedLlrp {
    state: SharedState,
    capabilities: LlrpCapabilities,
}

impl SimulatedLlrp {
    /// Speedway R420 over LLRP: 4 antennas, 10 to 32.5 dBm, ETSI 302 208.
    pub fn new() -> (Self, UhfHandle) {
        let mut table = vec![0.0];
        table.extend(quarter_db_table(10.0, 32.5));
        Self::with_tx_power_table(table)
    }

    /// `table[0]` is the reserved entry.
    pub fn with_tx_power_table(tx_power_table: Vec<f64>) -> (Self, UhfHandle) {
        let capabilities = LlrpCapabilities {
            model_name: "Speedway R420".to_string(),
            firmware_version: "7.5.0.181".to_string(),
            max_antennas: 4,
            communications_standard: 2,
            tx_power_table,
        };
        let initial = capabilities.tx_power_table.last().copied().unwrap_or_default();
        let state = SharedState::new(initial, capabilities.max_antennas);
        let handle = UhfHandle {
            state: state.clone(),
        };
        (
            Self {
                state,
                capabilities,
            },
            handle,
        )
    }
}

impl LlrpDriver for SimulatedLlrp {
    fn connect(&mut self, ip: &str) -> Result<()> {
        self.state.connect(ip)
    }

    fn disconnect(&mut self) -> Result<()> {
        self.state.disconnect()
    }

    fn capabilities(&mut self) -> Result<LlrpCapabilities> {
        self.state.session()?;
        Ok(self.capabilities.clone())
    }

    fn set_tx_power(&mut self, dbm: f64) -> Result<()> {
        self.state.session()?.tx_dbm = dbm;
        Ok(())
    }

    fn set_antenna_config(&mut self, config: &[bool]) -> Result<()> {
        self.state.session()?.antennas = config.to_vec();
        Ok(())
    }

    fn start_inventory(&mut self, sink: InventorySink) -> Result<()> {
        start_inventory(&self.state, sink)
    }

    fn stop_inventory(&mut self) -> Result<()> {
        stop_inventory(&self.state)
    }
}
