//! Inventory delivery.
//!
//! Vendor backends report tags from their own threads. [`InventorySink`]
//! wraps the consumer's channel so those threads can hand records over
//! without blocking: a full or closed channel drops the record.

use senseid_core::TagRecord;
use senseid_parsers::rain_tag;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

/// Non-blocking handle through which a driver reports detected tags.
#[derive(Debug, Clone)]
pub struct InventorySink {
    tx: mpsc::Sender<TagRecord>,
}

impl InventorySink {
    /// Wrap a consumer channel.
    pub fn new(tx: mpsc::Sender<TagRecord>) -> Self {
        Self { tx }
    }

    /// Deliver a record. Returns `false` if it was dropped.
    pub fn report(&self, record: TagRecord) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => true,
            Err(TrySendError::Full(record)) => {
                trace!("Inventory consumer lagging, dropped tag {}", record.id);
                false
            }
            Err(TrySendError::Closed(record)) => {
                trace!("Inventory consumer gone, dropped tag {}", record.id);
                false
            }
        }
    }

    /// Deliver the record of a UHF tag identified by its EPC.
    pub fn report_epc(&self, epc: &[u8]) -> bool {
        self.report(rain_tag(epc))
    }

    /// Whether the consumer dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
