//! Uniform control of RFID/NFC readers from multiple vendors.
//!
//! Every vendor backend implements [`SenseidReader`]: connect, capability
//! query, tx power and antenna control, and inventory streaming. What the
//! layer adds over the vendor SDKs is one normalization policy applied
//! identically to all of them:
//!
//! - tx power requests are clamped into the reader's own range, with a
//!   warning, never rejected;
//! - antenna configurations always keep at least one antenna enabled;
//! - an unreachable reader makes `connect` return `Ok(false)`.
//!
//! # Architecture
//!
//! - [`driver`]: synchronous vendor driver boundaries. The SDK bindings
//!   themselves live outside this crate.
//! - [`vendor`]: one reader per kind on top of its driver.
//! - [`devices`]: [`AnyReader`], runtime dispatch by kind.
//! - [`factory`]: [`create_reader`] keyed on a discovered descriptor.
//! - [`mock`]: simulated drivers with inspection handles.
//!
//! # Example
//!
//! ```
//! use senseid_core::{DeviceDescriptor, SupportedReader};
//! use senseid_readers::{SenseidReader, create_reader, mock::SimulatedDrivers};
//!
//! #[tokio::main]
//! async fn main() -> senseid_readers::Result<()> {
//!     let (drivers, _handles) = SimulatedDrivers::new();
//!     let descriptor = DeviceDescriptor::new(SupportedReader::Red4s, "/dev/ttyUSB0");
//!     let mut reader = create_reader(&descriptor, &drivers)?;
//!
//!     assert!(reader.connect(descriptor.address()).await?);
//!     let applied = reader.set_tx_power(99.0).await?;
//!     assert_eq!(applied, reader.get_details().await?.max_tx_power);
//!     Ok(())
//! }
//! ```

pub mod devices;
pub mod driver;
pub mod error;
pub mod factory;
pub mod inventory;
pub mod mock;
pub mod policy;
pub mod traits;
pub mod vendor;

pub use devices::AnyReader;
pub use error::{HardwareError, Result};
pub use factory::{DriverSet, create_reader};
pub use inventory::InventorySink;
pub use traits::SenseidReader;
