//! PC/SC reader discovery.
//!
//! The PC/SC reader name is both the identity and the connection address of
//! an ACR1552. A reader qualifies when its name contains every configured
//! marker.

use crate::presence::Observation;
use senseid_core::{DeviceDescriptor, SupportedReader};

/// Whether `name` contains all of `markers`.
pub fn matches_markers(name: &str, markers: &[String]) -> bool {
    markers.iter().all(|marker| name.contains(marker.as_str()))
}

/// Observation of a PC/SC reader list.
pub fn pcsc_observation<I, N>(names: I, markers: &[String]) -> Observation
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    names
        .into_iter()
        .filter(|name| matches_markers(name.as_ref(), markers))
        .map(|name| {
            let name = name.as_ref().to_string();
            let descriptor = DeviceDescriptor::new(SupportedReader::Acr1552, name.clone());
            (name, vec![descriptor])
        })
        .collect()
}

#[cfg(feature = "pcsc")]
mod system {
    use super::pcsc_observation;
    use crate::error::{Result, ScanError};
    use crate::presence::Observation;
    use crate::scanner::PresenceSource;
    use ::pcsc::{Context, Scope};
    use std::fmt;
    use tracing::{debug, trace};

    /// Reader list of the system PC/SC service.
    ///
    /// The context is established lazily and dropped after a failed listing,
    /// so a restarted PC/SC service is picked up on the next cycle.
    pub struct PcscSource {
        markers: Vec<String>,
        context: Option<Context>,
    }

    impl PcscSource {
        pub fn new(markers: Vec<String>) -> Self {
            Self {
                markers,
                context: None,
            }
        }

        fn context(&mut self) -> Result<&Context> {
            if self.context.is_none() {
                let context = Context::establish(Scope::User)
                    .map_err(|e| ScanError::unavailable("PC/SC", e.to_string()))?;
                debug!("PC/SC context established");
                self.context = Some(context);
            }
            self.context
                .as_ref()
                .ok_or_else(|| ScanError::unavailable("PC/SC", "no context"))
        }
    }

    impl fmt::Debug for PcscSource {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("PcscSource")
                .field("markers", &self.markers)
                .field("established", &self.context.is_some())
                .finish()
        }
    }

    impl PresenceSource for PcscSource {
        fn transport(&self) -> &'static str {
            "PC/SC"
        }

        fn observe(&mut self) -> Result<Observation> {
            let listing = self.context()?.list_readers_owned();
            let names = match listing {
                Ok(names) => names,
                Err(::pcsc::Error::NoReadersAvailable) => Vec::new(),
                Err(e) => {
                    self.context = None;
                    return Err(ScanError::unavailable("PC/SC", e.to_string()));
                }
            };

            let names: Vec<String> = names
                .iter()
                .map(|name| name.to_string_lossy().into_owned())
                .collect();
            trace!("PC/SC readers: {:?}", names);
            Ok(pcsc_observation(&names, &self.markers))
        }
    }
}

#[cfg(feature = "pcsc")]
pub use system::PcscSource;
