//! Vendor driver boundary.
//!
//! Each vendor SDK is reached through a small synchronous trait describing
//! only what the reader layer needs from it. Vendor calls block, so readers
//! keep their driver in a [`SharedDriver`] and run every call on the tokio
//! blocking pool.
//!
//! Streaming drivers receive an [`InventorySink`](crate::inventory::InventorySink)
//! when inventory starts and report tags from their own thread.

pub mod acr1552;
pub mod llrp;
pub mod nur;
pub mod octane;
pub mod red4s;

pub use acr1552::Acr1552Driver;
pub use llrp::{LlrpCapabilities, LlrpDriver, communications_standard_name};
pub use nur::{LinkFrequency, NurDeviceCaps, NurDriver, NurReaderInfo, RxDecoding};
pub use octane::{OctaneDriver, OctaneFeatureSet, OctaneReaderMode, OctaneSearchMode};
pub use red4s::{RedDriver, RedInfoDetail};

use crate::error::{HardwareError, Result};
use std::sync::{Arc, Mutex};

/// Driver shared between a reader and its background tasks.
#[derive(Debug)]
pub struct SharedDriver<D> {
    inner: Arc<Mutex<D>>,
    name: &'static str,
}

impl<D> Clone for SharedDriver<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: self.name,
        }
    }
}

impl<D: Send + 'static> SharedDriver<D> {
    /// Wrap a driver. `name` is used in error messages.
    pub fn new(driver: D, name: &'static str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(driver)),
            name,
        }
    }

    /// Run a driver call on the blocking pool.
    pub async fn call<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut D) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let name = self.name;
        tokio::task::spawn_blocking(move || {
            let mut driver = inner
                .lock()
                .map_err(|_| HardwareError::other(format!("{name} driver lock poisoned")))?;
            f(&mut *driver)
        })
        .await
        .map_err(|e| HardwareError::other(format!("{name} driver call aborted: {e}")))?
    }
}
