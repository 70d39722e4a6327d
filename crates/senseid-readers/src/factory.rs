//! Reader construction keyed on the reader kind.

use crate::devices::AnyReader;
use crate::driver::{Acr1552Driver, LlrpDriver, NurDriver, OctaneDriver, RedDriver};
use crate::error::{HardwareError, Result};
use crate::vendor::{Acr1552Reader, LlrpReader, NurReader, OctaneReader, Red4sReader};
use senseid_core::{DeviceDescriptor, SupportedReader};
use tracing::debug;

/// Source of vendor drivers, one associated type per backend.
///
/// Applications implement this over the vendor SDK bindings they ship;
/// tests use [`SimulatedDrivers`](crate::mock::SimulatedDrivers).
pub trait DriverSet {
    type Nur: NurDriver;
    type Octane: OctaneDriver;
    type Red: RedDriver;
    type Llrp: LlrpDriver;
    type Acr: Acr1552Driver;

    fn nur(&self) -> Self::Nur;
    fn octane(&self) -> Self::Octane;
    fn red(&self) -> Self::Red;
    fn llrp(&self) -> Self::Llrp;
    fn acr1552(&self) -> Self::Acr;
}

/// Build the reader matching a discovered descriptor.
///
/// The reader is returned disconnected; pass `descriptor.address()` to
/// `connect`.
///
/// # Errors
///
/// Returns [`HardwareError::Unsupported`] for kinds without a reader backend
/// (`KLSBLELCR`).
pub fn create_reader<S: DriverSet>(
    descriptor: &DeviceDescriptor,
    drivers: &S,
) -> Result<AnyReader<S>> {
    debug!("Creating reader for {}", descriptor);
    let reader = match descriptor.kind() {
        SupportedReader::Red4s => AnyReader::Red4s(Red4sReader::new(drivers.red())),
        SupportedReader::Nur => AnyReader::Nur(NurReader::new(drivers.nur())),
        SupportedReader::Octane => AnyReader::Octane(OctaneReader::new(drivers.octane())),
        SupportedReader::Llrp => AnyReader::Llrp(LlrpReader::new(drivers.llrp())),
        SupportedReader::Acr1552 => AnyReader::Acr1552(Acr1552Reader::new(drivers.acr1552())),
        SupportedReader::KlSbleLcr => {
            return Err(HardwareError::unsupported(format!(
                "no reader backend for {}",
                descriptor.kind()
            )));
        }
    };
    Ok(reader)
}
