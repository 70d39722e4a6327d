//! Simulated drivers for development and testing.
//!
//! Each simulated driver comes with a handle that inspects the settings the
//! reader applied and injects tags, the same way a physical reader would see
//! them.
//!
//! # Examples
//!
//! ```
//! use senseid_core::{DeviceDescriptor, SupportedReader};
//! use senseid_readers::factory::create_reader;
//! use senseid_readers::mock::SimulatedDrivers;
//! use senseid_readers::traits::SenseidReader;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> senseid_readers::Result<()> {
//!     let (drivers, handles) = SimulatedDrivers::new();
//!     let descriptor = DeviceDescriptor::new(SupportedReader::Nur, "/dev/ttyACM0");
//!     let mut reader = create_reader(&descriptor, &drivers)?;
//!     reader.connect(descriptor.address()).await?;
//!
//!     let (tx, mut rx) = mpsc::channel(8);
//!     reader.start_inventory_async(tx).await?;
//!     handles.nur.report_epc(&[0xE2, 0x80, 0x11, 0x60]);
//!
//!     let tag = rx.recv().await.unwrap();
//!     assert_eq!(tag.id, "E2801160");
//!     Ok(())
//! }
//! ```

mod nfc;
mod uhf;

pub use nfc::{Acr1552Handle, SimulatedAcr1552};
pub use uhf::{SimulatedLlrp, SimulatedNur, SimulatedOctane, SimulatedRed, UhfHandle};

use crate::factory::DriverSet;

/// One simulated device per vendor.
///
/// Every reader created from the same set talks to the same simulated
/// device.
#[derive(Debug, Clone)]
pub struct SimulatedDrivers {
    nur: SimulatedNur,
    octane: SimulatedOctane,
    red: SimulatedRed,
    llrp: SimulatedLlrp,
    acr1552: SimulatedAcr1552,
}

/// Handles of the devices in a [`SimulatedDrivers`] set.
#[derive(Debug, Clone)]
pub struct SimulatedHandles {
    pub nur: UhfHandle,
    pub octane: UhfHandle,
    pub red: UhfHandle,
    pub llrp: UhfHandle,
    pub acr1552: Acr1552Handle,
}

impl SimulatedDrivers {
    pub fn new() -> (Self, SimulatedHandles) {
        let (nur, nur_handle) = SimulatedNur::new();
        let (octane, octane_handle) = SimulatedOctane::new();
        let (red, red_handle) = SimulatedRed::new();
        let (llrp, llrp_handle) = SimulatedLlrp::new();
        let (acr1552, acr1552_handle) = SimulatedAcr1552::new();

        let drivers = Self {
            nur,
            octane,
            red,
            llrp,
            acr1552,
        };
        let handles = SimulatedHandles {
            nur: nur_handle,
            octane: octane_handle,
            red: red_handle,
            llrp: llrp_handle,
            acr1552: acr1552_handle,
        };
        (drivers, handles)
    }
}

impl DriverSet for SimulatedDrivers {
    type Nur = SimulatedNur;
    type Octane = SimulatedOctane;
    type Red = SimulatedRed;
    type Llrp = SimulatedLlrp;
    type Acr = SimulatedAcr1552;

    fn nur(&self) -> SimulatedNur {
        self.nur.clone()
    }

    fn octane(&self) -> SimulatedOctane {
        self.octane.clone()
    }

    fn red(&self) -> SimulatedRed {
        self.red.clone()
    }

    fn llrp(&self) -> SimulatedLlrp {
        self.llrp.clone()
    }

    fn acr1552(&self) -> SimulatedAcr1552 {
        self.acr1552.clone()
    }
}
