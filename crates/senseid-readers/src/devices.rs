//! Enum wrapper for reader dispatch.
//!
//! Native `async fn` in traits is not object-safe, so `Box<dyn SenseidReader>`
//! is not available. [`AnyReader`] provides runtime selection by kind with
//! concrete type dispatch instead.

use crate::error::Result;
use crate::factory::DriverSet;
use crate::traits::SenseidReader;
use crate::vendor::{Acr1552Reader, LlrpReader, NurReader, OctaneReader, Red4sReader};
use senseid_core::{ReaderDetails, SupportedReader, TagRecord};
use std::fmt;
use tokio::sync::mpsc;

/// A reader of any supported kind, produced by
/// [`create_reader`](crate::factory::create_reader).
///
/// # Examples
///
/// ```
/// use senseid_core::{DeviceDescriptor, SupportedReader};
/// use senseid_readers::factory::create_reader;
/// use senseid_readers::mock::SimulatedDrivers;
/// use senseid_readers::traits::SenseidReader;
///
/// #[tokio::main]
/// async fn main() -> senseid_readers::Result<()> {
///     let (drivers, _handles) = SimulatedDrivers::new();
///     let descriptor = DeviceDescriptor::new(SupportedReader::Octane, "192.168.1.20");
///
///     let mut reader = create_reader(&descriptor, &drivers)?;
///     assert!(reader.connect(descriptor.address()).await?);
///
///     let details = reader.get_details().await?;
///     println!("Reader: {}", details.model_name);
///
///     Ok(())
/// }
/// ```
pub enum AnyReader<S: DriverSet> {
    Red4s(Red4sReader<S::Red>),
    Nur(NurReader<S::Nur>),
    Octane(OctaneReader<S::Octane>),
    Llrp(LlrpReader<S::Llrp>),
    Acr1552(Acr1552Reader<S::Acr>),
}

impl<S: DriverSet> AnyReader<S> {
    /// NFC-specific operations, when this is an ACR1552.
    pub fn as_acr1552(&mut self) -> Option<&mut Acr1552Reader<S::Acr>> {
        match self {
            Self::Acr1552(reader) => Some(reader),
            _ => None,
        }
    }
}

impl<S: DriverSet> fmt::Debug for AnyReader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyReader")
            .field("kind", &self.kind())
            .field("connected", &self.is_connected())
            .finish()
    }
}

macro_rules! dispatch {
    ($self:ident, $reader:ident => $call:expr) => {
        match $self {
            Self::Red4s($reader) => $call,
            Self::Nur($reader) => $call,
            Self::Octane($reader) => $call,
            Self::Llrp($reader) => $call,
            Self::Acr1552($reader) => $call,
        }
    };
}

impl<S: DriverSet> SenseidReader for AnyReader<S> {
    fn kind(&self) -> SupportedReader {
        dispatch!(self, reader => reader.kind())
    }

    fn is_connected(&self) -> bool {
        dispatch!(self, reader => reader.is_connected())
    }

    async fn connect(&mut self, address: &str) -> Result<bool> {
        dispatch!(self, reader => reader.connect(address).await)
    }

    async fn disconnect(&mut self) -> Result<()> {
        dispatch!(self, reader => reader.disconnect().await)
    }

    async fn get_details(&mut self) -> Result<ReaderDetails> {
        dispatch!(self, reader => reader.get_details().await)
    }

    async fn get_tx_power(&mut self) -> Result<f64> {
        dispatch!(self, reader => reader.get_tx_power().await)
    }

    async fn set_tx_power(&mut self, dbm: f64) -> Result<f64> {
        dispatch!(self, reader => reader.set_tx_power(dbm).await)
    }

    async fn get_antenna_config(&mut self) -> Result<Vec<bool>> {
        dispatch!(self, reader => reader.get_antenna_config().await)
    }

    async fn set_antenna_config(&mut self, config: &[bool]) -> Result<Vec<bool>> {
        dispatch!(self, reader => reader.set_antenna_config(config).await)
    }

    async fn start_inventory_async(&mut self, sink: mpsc::Sender<TagRecord>) -> Result<()> {
        dispatch!(self, reader => reader.start_inventory_async(sink).await)
    }

    async fn stop_inventory_async(&mut self) -> Result<()> {
        dispatch!(self, reader => reader.stop_inventory_async().await)
    }
}
