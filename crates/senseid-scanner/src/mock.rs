//! Scripted transports for development and testing.
//!
//! [`ScriptedSource`] stands in for a polled transport: its handle plugs and
//! unplugs devices and makes the enumeration fail. The event-driven
//! counterpart lives in [`crate::mdns`] as
//! [`ScriptedBrowseScanner`](crate::mdns::ScriptedBrowseScanner).
//!
//! # Examples
//!
//! ```
//! use senseid_core::{DeviceDescriptor, SupportedReader};
//! use senseid_scanner::mock::ScriptedSource;
//! use senseid_scanner::scanner::PresenceSource;
//!
//! let (mut source, handle) = ScriptedSource::new("serial");
//! handle.attach(DeviceDescriptor::new(SupportedReader::Nur, "/dev/ttyACM0"));
//!
//! let observation = source.observe().unwrap();
//! assert_eq!(observation["/dev/ttyACM0"].len(), 1);
//! ```

use crate::error::{Result, ScanError};
use crate::presence::Observation;
use crate::scanner::PresenceSource;
use senseid_core::DeviceDescriptor;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ScriptState {
    observation: Observation,
    failing: bool,
    polls: usize,
}

/// Polled transport whose listing is set through a [`ScriptedHandle`].
#[derive(Debug)]
pub struct ScriptedSource {
    transport: &'static str,
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedSource {
    pub fn new(transport: &'static str) -> (Self, ScriptedHandle) {
        let state = Arc::new(Mutex::new(ScriptState::default()));
        let handle = ScriptedHandle {
            state: Arc::clone(&state),
        };
        (Self { transport, state }, handle)
    }
}

impl PresenceSource for ScriptedSource {
    fn transport(&self) -> &'static str {
        self.transport
    }

    fn observe(&mut self) -> Result<Observation> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.polls += 1;
        if state.failing {
            return Err(ScanError::unavailable(self.transport, "scripted failure"));
        }
        Ok(state.observation.clone())
    }
}

/// Control handle of a [`ScriptedSource`].
#[derive(Debug, Clone)]
pub struct ScriptedHandle {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedHandle {
    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `descriptor` visible at its address from the next enumeration on.
    pub fn attach(&self, descriptor: DeviceDescriptor) {
        let mut state = self.lock();
        let at_address = state
            .observation
            .entry(descriptor.address().to_string())
            .or_default();
        if !at_address.contains(&descriptor) {
            at_address.push(descriptor);
        }
    }

    /// Remove one descriptor, leaving others at the same address.
    pub fn detach(&self, descriptor: &DeviceDescriptor) {
        let mut state = self.lock();
        if let Some(at_address) = state.observation.get_mut(descriptor.address()) {
            at_address.retain(|d| d != descriptor);
            if at_address.is_empty() {
                state.observation.remove(descriptor.address());
            }
        }
    }

    /// Remove everything at `address`.
    pub fn unplug(&self, address: &str) {
        self.lock().observation.remove(address);
    }

    /// Make enumerations fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Enumerations performed so far.
    pub fn polls(&self) -> usize {
        self.lock().polls
    }
}
