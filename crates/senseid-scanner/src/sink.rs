//! Where scanners report presence transitions.

use senseid_core::DeviceDescriptor;
use std::sync::Arc;

/// Receiver of presence transitions.
///
/// Called from scanner tasks and threads concurrently; implementations
/// serialize internally.
pub trait DeviceSink: Send + Sync + 'static {
    /// A device was observed for the first time.
    fn device_added(&self, descriptor: DeviceDescriptor);

    /// A device previously reported as added is gone.
    fn device_removed(&self, descriptor: &DeviceDescriptor);
}

/// Sink handle shared between all scanners of a registry.
pub type SharedSink = Arc<dyn DeviceSink>;

pub(crate) fn emit(sink: &dyn DeviceSink, transitions: crate::presence::Transitions) {
    for descriptor in &transitions.removed {
        sink.device_removed(descriptor);
    }
    for descriptor in transitions.added {
        sink.device_added(descriptor);
    }
}
