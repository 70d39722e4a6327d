//! Simulated ACR1552 with an NFC Type-5 tag that can be placed in the field.

use crate::driver::Acr1552Driver;
use crate::error::{HardwareError, Result};
use senseid_core::constants::NFC_BLOCK_SIZE;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct Tag {
    uid: Vec<u8>,
    memory: Vec<u8>,
}

#[derive(Debug)]
struct Acr1552State {
    reachable: bool,
    connected: bool,
    field_on: bool,
    bulk_mode: bool,
    tag: Option<Tag>,
    block_reads: Vec<(u16, u16)>,
}

/// Simulated ACR1552 reader.
#[derive(Debug, Clone)]
pub struct SimulatedAcr1552 {
    state: Arc<Mutex<Acr1552State>>,
}

impl SimulatedAcr1552 {
    pub fn new() -> (Self, Acr1552Handle) {
        let state = Arc::new(Mutex::new(Acr1552State {
            reachable: true,
            connected: false,
            field_on: false,
            bulk_mode: false,
            tag: None,
            block_reads: Vec::new(),
        }));
        let handle = Acr1552Handle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }

    fn lock(&self) -> MutexGuard<'_, Acr1552State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn session(&self) -> Result<MutexGuard<'_, Acr1552State>> {
        let state = self.lock();
        if state.connected {
            Ok(state)
        } else {
            Err(HardwareError::communication("reader not connected"))
        }
    }
}

impl Acr1552Driver for SimulatedAcr1552 {
    fn connect(&mut self, reader_name: &str) -> Result<()> {
        let mut state = self.lock();
        if !state.reachable {
            return Err(HardwareError::communication(format!(
                "no smart card reader named {reader_name}"
            )));
        }
        state.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.lock().connected = false;
        Ok(())
    }

    fn firmware_version(&mut self) -> Result<String> {
        self.session()?;
        Ok("1.0.1".to_string())
    }

    fn set_field(&mut self, on: bool) -> Result<()> {
        self.session()?.field_on = on;
        Ok(())
    }

    fn set_bulk_mode(&mut self, bulk: bool) -> Result<()> {
        self.session()?.bulk_mode = bulk;
        Ok(())
    }

    fn uid(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.session()?.tag.as_ref().map(|tag| tag.uid.clone()))
    }

    fn read_blocks(&mut self, start_block: u16, n_blocks: u16) -> Result<Vec<u8>> {
        let mut state = self.session()?;
        state.block_reads.push((start_block, n_blocks));
        let tag = state
            .tag
            .as_ref()
            .ok_or_else(|| HardwareError::communication("no tag in field"))?;

        let start = usize::from(start_block) * NFC_BLOCK_SIZE;
        let len = usize::from(n_blocks) * NFC_BLOCK_SIZE;
        let mut data = vec![0u8; len];
        if start < tag.memory.len() {
            let end = (start + len).min(tag.memory.len());
            data[..end - start].copy_from_slice(&tag.memory[start..end]);
        }
        Ok(data)
    }

    fn write_blocks(&mut self, start_block: u16, data: &[u8]) -> Result<()> {
        let mut state = self.session()?;
        let tag = state
            .tag
            .as_mut()
            .ok_or_else(|| HardwareError::communication("no tag in field"))?;

        let start = usize::from(start_block) * NFC_BLOCK_SIZE;
        if tag.memory.len() < start + data.len() {
            tag.memory.resize(start + data.len(), 0);
        }
        tag.memory[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}

/// Control and inspection handle of a [`SimulatedAcr1552`].
#[derive(Debug, Clone)]
pub struct Acr1552Handle {
    state: Arc<Mutex<Acr1552State>>,
}

impl Acr1552Handle {
    fn lock(&self) -> MutexGuard<'_, Acr1552State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.lock().reachable = reachable;
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    /// Place a tag with the given UID and memory image in the field.
    pub fn present_tag(&self, uid: &[u8], memory: &[u8]) {
        self.lock().tag = Some(Tag {
            uid: uid.to_vec(),
            memory: memory.to_vec(),
        });
    }

    pub fn remove_tag(&self) {
        self.lock().tag = None;
    }

    /// Memory image of the tag in the field.
    pub fn memory(&self) -> Option<Vec<u8>> {
        self.lock().tag.as_ref().map(|tag| tag.memory.clone())
    }

    pub fn field_on(&self) -> bool {
        self.lock().field_on
    }

    pub fn bulk_mode(&self) -> bool {
        self.lock().bulk_mode
    }

    /// Every `(start_block, n_blocks)` read issued so far.
    pub fn block_reads(&self) -> Vec<(u16, u16)> {
        self.lock().block_reads.clone()
    }
}
