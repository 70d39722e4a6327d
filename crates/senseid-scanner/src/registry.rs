//! Device registry.
//!
//! The registry owns every transport scanner and the canonical set of
//! discovered readers. Scanners run as Tokio tasks and report into one
//! shared state, whose single lock serializes all updates.
//!
//! ```text
//! ┌──────────┐
//! │ Serial   │──┐
//! └──────────┘  │   ┌───────────────┐    broadcast     ┌─────────────┐
//! ┌──────────┐  ├──►│ RegistryState │────────────────► │ subscribers │
//! │ PC/SC    │──┤   │ (one Mutex)   │                  └─────────────┘
//! └──────────┘  │   └───────────────┘    watch
//! ┌──────────┐  │           │────────────────────────► wait_for_reader_of_type
//! │ mDNS     │──┘
//! └──────────┘
//! ```
//!
//! Change notifications are sent synchronously from the reporting scanner
//! into a bounded broadcast queue per subscriber. A subscriber that falls
//! behind by more than [`ScannerConfig::event_capacity`] events lags and
//! skips the oldest ones.
//!
//! # Examples
//!
//! ```
//! use senseid_core::{DeviceDescriptor, SupportedReader};
//! use senseid_scanner::mock::ScriptedSource;
//! use senseid_scanner::{DeviceRegistry, PollingScanner, ScannerConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (source, handle) = ScriptedSource::new("serial");
//!     let scanner = PollingScanner::new(source, Duration::from_millis(10));
//!     let mut registry =
//!         DeviceRegistry::with_scanners(ScannerConfig::default(), vec![scanner.into()]);
//!
//!     registry.start(false).await;
//!     handle.attach(DeviceDescriptor::new(SupportedReader::Nur, "/dev/ttyACM0"));
//!
//!     let nur = registry
//!         .wait_for_reader_of_type(SupportedReader::Nur, Some(Duration::from_secs(5)))
//!         .await;
//!     assert_eq!(nur.unwrap().address(), "/dev/ttyACM0");
//!
//!     registry.stop().await;
//! }
//! ```

use crate::config::ScannerConfig;
use crate::scanner::{AnyTransportScanner, TransportScanner};
use crate::sink::{DeviceSink, SharedSink};
use chrono::{DateTime, Utc};
use senseid_core::{DeviceDescriptor, SupportedReader};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// Presence transition of a registered reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RegistryEvent {
    /// Reader inserted into the registry.
    Added(DeviceDescriptor),
    /// Reader removed from the registry.
    Removed(DeviceDescriptor),
}

impl RegistryEvent {
    pub fn descriptor(&self) -> &DeviceDescriptor {
        match self {
            Self::Added(descriptor) | Self::Removed(descriptor) => descriptor,
        }
    }
}

/// A registered reader and when it was first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub descriptor: DeviceDescriptor,
    pub first_seen: DateTime<Utc>,
}

/// State shared with the scanners.
#[derive(Debug)]
struct RegistryState {
    entries: Mutex<Vec<RegistryEntry>>,
    events: broadcast::Sender<RegistryEvent>,
    revision: watch::Sender<u64>,
}

impl RegistryState {
    fn new(event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        let (revision, _) = watch::channel(0);
        Self {
            entries: Mutex::new(Vec::new()),
            events,
            revision,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RegistryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish under the entries lock so subscribers see events in the
    /// order the set changed.
    fn publish(&self, event: RegistryEvent) {
        if self.events.send(event).is_err() {
            trace!("No registry subscribers");
        }
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn clear(&self) {
        let mut entries = self.lock();
        if !entries.is_empty() {
            debug!("Registry reset, forgetting {} readers", entries.len());
            entries.clear();
            self.revision.send_modify(|revision| *revision += 1);
        }
    }

    fn first_of_type(&self, kind: SupportedReader) -> Option<DeviceDescriptor> {
        self.lock()
            .iter()
            .find(|entry| entry.descriptor.kind() == kind)
            .map(|entry| entry.descriptor.clone())
    }
}

impl DeviceSink for RegistryState {
    fn device_added(&self, descriptor: DeviceDescriptor) {
        let mut entries = self.lock();
        if entries.iter().any(|entry| entry.descriptor == descriptor) {
            trace!("{} already registered", descriptor);
            return;
        }
        info!("Reader found: {}", descriptor);
        entries.push(RegistryEntry {
            descriptor: descriptor.clone(),
            first_seen: Utc::now(),
        });
        self.publish(RegistryEvent::Added(descriptor));
    }

    fn device_removed(&self, descriptor: &DeviceDescriptor) {
        let mut entries = self.lock();
        let Some(index) = entries
            .iter()
            .position(|entry| entry.descriptor == *descriptor)
        else {
            trace!("{} was not registered", descriptor);
            return;
        };
        info!("Reader gone: {}", descriptor);
        entries.remove(index);
        self.publish(RegistryEvent::Removed(descriptor.clone()));
    }
}

#[derive(Debug)]
struct RunningScanners {
    cancel: CancellationToken,
    tasks: JoinSet<AnyTransportScanner>,
}

/// Canonical set of discovered readers, fed by the transport scanners.
///
/// The registry never holds two entries with the same descriptor. A
/// descriptor reported by two scanners is registered once and removed by
/// whichever reports its absence first.
#[derive(Debug)]
pub struct DeviceRegistry {
    state: Arc<RegistryState>,
    idle: Vec<AnyTransportScanner>,
    running: Option<RunningScanners>,
}

impl DeviceRegistry {
    /// Registry over the system transports enabled in `config` and compiled
    /// in through cargo features.
    pub fn new(config: ScannerConfig) -> Self {
        let scanners = system_scanners(&config);
        Self::with_scanners(config, scanners)
    }

    /// Registry over an explicit set of scanners.
    pub fn with_scanners(config: ScannerConfig, scanners: Vec<AnyTransportScanner>) -> Self {
        Self {
            state: Arc::new(RegistryState::new(config.event_capacity)),
            idle: scanners,
            running: None,
        }
    }

    /// Start every scanner.
    ///
    /// With `reset`, the registry and every scanner's memory of previously
    /// seen devices are cleared first, so devices still present are reported
    /// again. Starting a running registry without `reset` does nothing; with
    /// `reset` it restarts the scanners.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn start(&mut self, reset: bool) {
        if self.running.is_some() {
            if !reset {
                debug!("Registry already scanning");
                return;
            }
            self.stop().await;
        }

        if reset {
            self.state.clear();
            for scanner in &mut self.idle {
                scanner.reset();
            }
        }

        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();
        let sink: SharedSink = self.state.clone();
        for mut scanner in self.idle.drain(..) {
            let sink = Arc::clone(&sink);
            let cancel = cancel.clone();
            debug!("Starting {} scanner", scanner.transport());
            tasks.spawn(async move {
                scanner.run(sink, cancel).await;
                scanner
            });
        }
        info!("Registry scanning on {} transports", tasks.len());
        self.running = Some(RunningScanners { cancel, tasks });
    }

    /// Stop every scanner and wait for them to finish.
    ///
    /// Once this returns no scanner reports anything until the next
    /// [`start`](Self::start). Stopping a stopped registry does nothing.
    pub async fn stop(&mut self) {
        let Some(mut running) = self.running.take() else {
            return;
        };
        running.cancel.cancel();

        while let Some(result) = running.tasks.join_next().await {
            match result {
                Ok(scanner) => self.idle.push(scanner),
                Err(e) if e.is_panic() => error!("Scanner task panicked: {}", e),
                Err(e) => warn!("Scanner task ended abnormally: {}", e),
            }
        }
        info!("Registry stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Receive every registry change from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.state.events.subscribe()
    }

    /// Snapshot of the registered readers, in discovery order.
    pub fn readers(&self) -> Vec<DeviceDescriptor> {
        self.state
            .lock()
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Snapshot of the registered readers with their first-seen time.
    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.state.lock().clone()
    }

    pub fn readers_of_type(&self, kind: SupportedReader) -> Vec<DeviceDescriptor> {
        self.state
            .lock()
            .iter()
            .filter(|entry| entry.descriptor.kind() == kind)
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Wait until a reader of `kind` is registered.
    ///
    /// `None` or a zero timeout waits forever. Returns `None` when the
    /// timeout expires first. Wakes on registry changes only.
    pub async fn wait_for_reader_of_type(
        &self,
        kind: SupportedReader,
        timeout: Option<Duration>,
    ) -> Option<DeviceDescriptor> {
        let wait = self.wait_for(kind);
        match timeout.filter(|timeout| !timeout.is_zero()) {
            Some(timeout) => tokio::time::timeout(timeout, wait).await.ok().flatten(),
            None => wait.await,
        }
    }

    async fn wait_for(&self, kind: SupportedReader) -> Option<DeviceDescriptor> {
        let mut revision = self.state.revision.subscribe();
        loop {
            if let Some(descriptor) = self.state.first_of_type(kind) {
                return Some(descriptor);
            }
            if revision.changed().await.is_err() {
                return None;
            }
        }
    }
}

impl Drop for DeviceRegistry {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.cancel.cancel();
        }
    }
}

fn system_scanners(config: &ScannerConfig) -> Vec<AnyTransportScanner> {
    #[allow(unused_mut)]
    let mut scanners = Vec::new();

    #[cfg(feature = "serial")]
    if config.serial_enabled {
        scanners.push(AnyTransportScanner::Serial(
            crate::scanner::PollingScanner::new(
                crate::serial::SerialPortSource::new(),
                config.poll_interval,
            ),
        ));
    }

    #[cfg(feature = "pcsc")]
    if config.pcsc_enabled {
        scanners.push(AnyTransportScanner::Pcsc(
            crate::scanner::PollingScanner::new(
                crate::pcsc::PcscSource::new(config.pcsc_name_markers.clone()),
                config.poll_interval,
            ),
        ));
    }

    #[cfg(feature = "mdns")]
    if config.mdns_enabled {
        scanners.push(AnyTransportScanner::Mdns(crate::mdns::MdnsScanner::new(
            config.mdns_service_type.clone(),
            config.mdns_name_markers.clone(),
            config.poll_interval,
        )));
    }

    if scanners.is_empty() {
        warn!("No transport scanner enabled: {:?}", config);
    }
    scanners
}
