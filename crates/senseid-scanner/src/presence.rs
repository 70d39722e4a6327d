//! Edge detection between two consecutive observations of a transport.
//!
//! A polled transport reports everything it sees on every cycle. The
//! [`PresenceSet`] remembers the previous cycle and turns the raw listing
//! into transitions, so a device present in two consecutive cycles produces
//! no event.

use senseid_core::DeviceDescriptor;
use std::collections::BTreeMap;

/// One enumeration of a transport: transport address to the descriptors
/// recognised there.
///
/// A single address may carry several descriptors when one hardware
/// signature matches more than one reader kind.
pub type Observation = BTreeMap<String, Vec<DeviceDescriptor>>;

/// Transitions produced by one reconcile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transitions {
    pub added: Vec<DeviceDescriptor>,
    pub removed: Vec<DeviceDescriptor>,
}

impl Transitions {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Previous observation of one transport.
#[derive(Debug, Clone, Default)]
pub struct PresenceSet {
    previous: Observation,
}

impl PresenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything seen so far. The next reconcile reports every
    /// present device as added.
    pub fn clear(&mut self) {
        self.previous.clear();
    }

    /// Descriptors currently considered present.
    pub fn descriptors(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.previous.values().flatten()
    }

    /// Diff `current` against the previous observation and remember it.
    ///
    /// Removals come first so a device that moved between two addresses is
    /// torn down before it reappears.
    pub fn reconcile(&mut self, current: Observation) -> Transitions {
        let mut transitions = Transitions::default();

        for (address, before) in &self.previous {
            let after = current.get(address);
            for descriptor in before {
                if !after.is_some_and(|after| after.contains(descriptor)) {
                    transitions.removed.push(descriptor.clone());
                }
            }
        }

        for (address, after) in &current {
            let before = self.previous.get(address);
            for descriptor in after {
                let known = before.is_some_and(|before| before.contains(descriptor));
                if !known && !transitions.added.contains(descriptor) {
                    transitions.added.push(descriptor.clone());
                }
            }
        }

        self.previous = current;
        transitions
    }
}
