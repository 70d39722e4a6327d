//! Network reader discovery over mDNS.
//!
//! Speedway readers advertise an HTTP service whose instance name carries a
//! model marker. One box speaks both the Octane and the LLRP protocol, so
//! each new IP yields an `OCTANE` and an `LLRP` descriptor. Several services
//! may point at the same IP; the descriptors go away with the last of them.
//!
//! The browse is event driven. [`BrowseTracker`] holds the state shared by
//! the system scanner ([`MdnsScanner`], feature `mdns`) and the scripted one
//! used in tests ([`ScriptedBrowseScanner`]).

use crate::presence::Transitions;
use crate::scanner::TransportScanner;
use crate::sink::{SharedSink, emit};
use senseid_core::{DeviceDescriptor, SupportedReader};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Kinds reachable at the IP of a discovered network reader.
pub const NETWORK_READER_KINDS: [SupportedReader; 2] =
    [SupportedReader::Octane, SupportedReader::Llrp];

/// Service browse notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseEvent {
    /// A service instance was resolved to addresses.
    Resolved { name: String, addresses: Vec<IpAddr> },
    /// A service instance went away.
    Removed { name: String },
}

/// Service instances currently mapped to reader IPs.
#[derive(Debug, Clone, Default)]
pub struct BrowseTracker {
    markers: Vec<String>,
    services: HashMap<String, Ipv4Addr>,
}

impl BrowseTracker {
    pub fn new(markers: Vec<String>) -> Self {
        Self {
            markers,
            services: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.services.clear();
    }

    /// IPs with at least one live service, lowest first.
    pub fn ips(&self) -> Vec<Ipv4Addr> {
        let mut ips: Vec<Ipv4Addr> = self.services.values().copied().collect();
        ips.sort();
        ips.dedup();
        ips
    }

    fn is_reader(&self, name: &str) -> bool {
        self.markers.iter().any(|marker| name.contains(marker.as_str()))
    }

    fn is_known(&self, ip: Ipv4Addr) -> bool {
        self.services.values().any(|known| *known == ip)
    }

    fn descriptors(ip: Ipv4Addr) -> Vec<DeviceDescriptor> {
        NETWORK_READER_KINDS
            .iter()
            .map(|kind| DeviceDescriptor::new(*kind, ip.to_string()))
            .collect()
    }

    /// Apply one browse event.
    pub fn apply(&mut self, event: BrowseEvent) -> Transitions {
        let mut transitions = Transitions::default();
        match event {
            BrowseEvent::Resolved { name, addresses } => {
                if !self.is_reader(&name) {
                    return transitions;
                }
                let Some(ip) = addresses
                    .iter()
                    .filter_map(|address| match address {
                        IpAddr::V4(ip) => Some(*ip),
                        IpAddr::V6(_) => None,
                    })
                    .min()
                else {
                    debug!("Service {} resolved without an IPv4 address", name);
                    return transitions;
                };

                if let Some(previous) = self.services.remove(&name) {
                    if previous == ip {
                        self.services.insert(name, ip);
                        return transitions;
                    }
                    if !self.is_known(previous) {
                        transitions.removed = Self::descriptors(previous);
                    }
                }
                if !self.is_known(ip) {
                    info!("New network reader found: {} ({})", ip, name);
                    transitions.added = Self::descriptors(ip);
                }
                self.services.insert(name, ip);
            }
            BrowseEvent::Removed { name } => {
                if let Some(ip) = self.services.remove(&name)
                    && !self.is_known(ip)
                {
                    info!("Network reader gone: {} ({})", ip, name);
                    transitions.removed = Self::descriptors(ip);
                }
            }
        }
        transitions
    }
}

// ============================================================================
// Scripted browse
// ============================================================================

/// Event-driven scanner fed through a [`BrowseHandle`].
#[derive(Debug)]
pub struct ScriptedBrowseScanner {
    tracker: BrowseTracker,
    events: mpsc::UnboundedReceiver<BrowseEvent>,
}

impl ScriptedBrowseScanner {
    pub fn new(markers: Vec<String>) -> (Self, BrowseHandle) {
        let (tx, events) = mpsc::unbounded_channel();
        let scanner = Self {
            tracker: BrowseTracker::new(markers),
            events,
        };
        (scanner, BrowseHandle { tx })
    }
}

impl TransportScanner for ScriptedBrowseScanner {
    fn transport(&self) -> &'static str {
        "mDNS"
    }

    fn reset(&mut self) {
        self.tracker.clear();
    }

    async fn run(&mut self, sink: SharedSink, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = self.events.recv() => match event {
                    Some(event) => emit(sink.as_ref(), self.tracker.apply(event)),
                    None => {
                        cancel.cancelled().await;
                        break;
                    }
                },
            }
        }
    }
}

/// Announces services to a [`ScriptedBrowseScanner`].
#[derive(Debug, Clone)]
pub struct BrowseHandle {
    tx: mpsc::UnboundedSender<BrowseEvent>,
}

impl BrowseHandle {
    /// Announce a resolved service. Returns `false` once the scanner is gone.
    pub fn resolve(&self, name: &str, addresses: &[IpAddr]) -> bool {
        self.tx
            .send(BrowseEvent::Resolved {
                name: name.to_string(),
                addresses: addresses.to_vec(),
            })
            .is_ok()
    }

    /// Withdraw a service. Returns `false` once the scanner is gone.
    pub fn remove(&self, name: &str) -> bool {
        self.tx
            .send(BrowseEvent::Removed {
                name: name.to_string(),
            })
            .is_ok()
    }
}

// ============================================================================
// System browse
// ============================================================================

#[cfg(feature = "mdns")]
mod system {
    use super::{BrowseEvent, BrowseTracker};
    use crate::error::{Result, ScanError};
    use crate::scanner::{TransportScanner, open_with_retry};
    use crate::sink::{SharedSink, emit};
    use mdns_sd::{ServiceDaemon, ServiceEvent};
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use tracing::{debug, trace, warn};

    /// How often the browse thread checks for cancellation.
    const RECV_TIMEOUT: Duration = Duration::from_millis(200);

    /// mDNS browse through the system network interfaces.
    ///
    /// Events are received on a dedicated OS thread for as long as the
    /// scanner runs; the thread is joined before `run` returns. When the
    /// daemon cannot be started, or the browse ends on its own, it is
    /// reopened every `retry_interval`.
    #[derive(Debug)]
    pub struct MdnsScanner {
        service_type: String,
        retry_interval: Duration,
        tracker: Arc<Mutex<BrowseTracker>>,
    }

    impl MdnsScanner {
        pub fn new(
            service_type: impl Into<String>,
            markers: Vec<String>,
            retry_interval: Duration,
        ) -> Self {
            Self {
                service_type: service_type.into(),
                retry_interval,
                tracker: Arc::new(Mutex::new(BrowseTracker::new(markers))),
            }
        }
    }

    fn open_browse(
        service_type: &str,
    ) -> Result<(ServiceDaemon, mdns_sd::Receiver<ServiceEvent>)> {
        let daemon =
            ServiceDaemon::new().map_err(|e| ScanError::unavailable("mDNS", e.to_string()))?;
        match daemon.browse(service_type) {
            Ok(receiver) => Ok((daemon, receiver)),
            Err(e) => {
                if let Err(e) = daemon.shutdown() {
                    debug!("mDNS daemon shutdown: {}", e);
                }
                Err(ScanError::unavailable("mDNS", e.to_string()))
            }
        }
    }

    fn translate(event: ServiceEvent) -> Option<BrowseEvent> {
        match event {
            ServiceEvent::ServiceResolved(info) => Some(BrowseEvent::Resolved {
                name: info.get_fullname().to_string(),
                addresses: info.get_addresses().iter().copied().collect(),
            }),
            ServiceEvent::ServiceRemoved(_, name) => Some(BrowseEvent::Removed { name }),
            other => {
                trace!("mDNS event ignored: {:?}", other);
                None
            }
        }
    }

    fn browse_loop(
        receiver: mdns_sd::Receiver<ServiceEvent>,
        tracker: Arc<Mutex<BrowseTracker>>,
        sink: SharedSink,
        cancel: CancellationToken,
    ) {
        while !cancel.is_cancelled() {
            match receiver.recv_timeout(RECV_TIMEOUT) {
                Ok(event) => {
                    if let Some(event) = translate(event) {
                        let transitions = tracker
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .apply(event);
                        emit(sink.as_ref(), transitions);
                    }
                }
                Err(_) if receiver.is_disconnected() => {
                    debug!("mDNS browse channel closed");
                    break;
                }
                Err(_) => {}
            }
        }
    }

    impl TransportScanner for MdnsScanner {
        fn transport(&self) -> &'static str {
            "mDNS"
        }

        fn reset(&mut self) {
            self.tracker
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }

        async fn run(&mut self, sink: SharedSink, cancel: CancellationToken) {
            loop {
                let service_type = self.service_type.as_str();
                let Some((daemon, receiver)) =
                    open_with_retry("mDNS", self.retry_interval, &cancel, || {
                        open_browse(service_type)
                    })
                    .await
                else {
                    return;
                };
                debug!("Browsing {}", self.service_type);

                let tracker = Arc::clone(&self.tracker);
                let thread_sink = Arc::clone(&sink);
                let stop = cancel.clone();
                let thread = std::thread::Builder::new()
                    .name("senseid-mdns".to_string())
                    .spawn(move || browse_loop(receiver, tracker, thread_sink, stop));
                match thread {
                    Ok(thread) => {
                        let joined = tokio::task::spawn_blocking(move || thread.join()).await;
                        if !matches!(joined, Ok(Ok(()))) {
                            warn!("mDNS browse thread ended abnormally");
                        }
                    }
                    Err(e) => warn!("Failed to spawn mDNS browse thread: {}", e),
                }

                if let Err(e) = daemon.shutdown() {
                    debug!("mDNS daemon shutdown: {}", e);
                }
                if cancel.is_cancelled() {
                    return;
                }

                warn!("mDNS browse of {} ended, reopening", self.service_type);
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(self.retry_interval) => {}
                }
            }
        }
    }
}

#[cfg(feature = "mdns")]
pub use system::MdnsScanner;
