//! Transport scanner trait and its implementations.
//!
//! Polled transports (serial, PC/SC) implement [`PresenceSource`]: one
//! blocking enumeration per call. [`PollingScanner`] drives a source on a
//! fixed interval and turns its listings into transitions. Event-driven
//! transports (mDNS) implement [`TransportScanner`] directly.
//!
//! [`AnyTransportScanner`] is the closed set of scanners a
//! [`DeviceRegistry`](crate::DeviceRegistry) can own.

#![allow(async_fn_in_trait)]

use crate::error::{Result, ScanError};
use crate::mdns::ScriptedBrowseScanner;
use crate::mock::ScriptedSource;
use crate::presence::{Observation, PresenceSet};
use crate::sink::{DeviceSink, SharedSink, emit};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[cfg(feature = "mdns")]
use crate::mdns::MdnsScanner;
#[cfg(feature = "pcsc")]
use crate::pcsc::PcscSource;
#[cfg(feature = "serial")]
use crate::serial::SerialPortSource;

/// One polled transport.
pub trait PresenceSource: Send + 'static {
    /// Transport name used in logs.
    fn transport(&self) -> &'static str;

    /// Enumerate the transport once. May block.
    fn observe(&mut self) -> Result<Observation>;
}

/// Watches one transport and reports presence transitions.
pub trait TransportScanner: Send + 'static {
    /// Transport name used in logs.
    fn transport(&self) -> &'static str;

    /// Forget every device observed so far.
    fn reset(&mut self);

    /// Scan until `cancel` fires.
    ///
    /// Nothing is reported to `sink` once this returns.
    async fn run(&mut self, sink: SharedSink, cancel: CancellationToken);
}

/// Drives a [`PresenceSource`] on a fixed interval.
#[derive(Debug)]
pub struct PollingScanner<S> {
    source: Arc<Mutex<S>>,
    transport: &'static str,
    interval: Duration,
    presence: PresenceSet,
    failing: bool,
}

impl<S: PresenceSource> PollingScanner<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self {
            transport: source.transport(),
            source: Arc::new(Mutex::new(source)),
            interval,
            presence: PresenceSet::new(),
            failing: false,
        }
    }

    async fn observe(&self) -> Result<Observation> {
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || {
            source
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .observe()
        })
        .await
        .map_err(|e| ScanError::other(format!("{} enumeration task failed: {e}", self.transport)))?
    }

    /// Enumerate once and report the transitions.
    ///
    /// A failed enumeration leaves the previous observation untouched, so no
    /// device is reported as removed because of a transport hiccup.
    pub async fn poll_once(&mut self, sink: &dyn DeviceSink) -> Result<()> {
        let observation = match self.observe().await {
            Ok(observation) => observation,
            Err(e) => {
                if !self.failing {
                    warn!("{} scan failed, retrying next cycle: {}", self.transport, e);
                } else {
                    debug!("{} scan still failing: {}", self.transport, e);
                }
                self.failing = true;
                return Err(e);
            }
        };
        if self.failing {
            info!("{} scan recovered", self.transport);
            self.failing = false;
        }

        emit(sink, self.presence.reconcile(observation));
        Ok(())
    }
}

impl<S: PresenceSource> TransportScanner for PollingScanner<S> {
    fn transport(&self) -> &'static str {
        self.transport
    }

    fn reset(&mut self) {
        self.presence.clear();
    }

    async fn run(&mut self, sink: SharedSink, cancel: CancellationToken) {
        debug!("{} scanner started", self.transport);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            // Errors are logged by poll_once and retried on the next tick.
            let _ = self.poll_once(sink.as_ref()).await;
        }
        debug!("{} scanner stopped", self.transport);
    }
}

/// Call `open` until it succeeds, sleeping `interval` between attempts.
///
/// Returns `None` once `cancel` fires. Only the first failure of a streak is
/// logged as a warning.
pub async fn open_with_retry<T, F>(
    transport: &str,
    interval: Duration,
    cancel: &CancellationToken,
    mut open: F,
) -> Option<T>
where
    F: FnMut() -> Result<T>,
{
    let mut failures = 0u32;
    loop {
        if cancel.is_cancelled() {
            return None;
        }
        match open() {
            Ok(value) => {
                if failures > 0 {
                    info!("{} available after {} failed attempts", transport, failures);
                }
                return Some(value);
            }
            Err(e) => {
                if failures == 0 {
                    warn!("{} unavailable, retrying every {:?}: {}", transport, interval, e);
                } else {
                    debug!("{} still unavailable: {}", transport, e);
                }
                failures += 1;
            }
        }
        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Every scanner a registry can own.
#[derive(Debug)]
pub enum AnyTransportScanner {
    /// USB serial ports.
    #[cfg(feature = "serial")]
    Serial(PollingScanner<SerialPortSource>),

    /// PC/SC reader list.
    #[cfg(feature = "pcsc")]
    Pcsc(PollingScanner<PcscSource>),

    /// mDNS service browse.
    #[cfg(feature = "mdns")]
    Mdns(MdnsScanner),

    /// Polled transport with a scripted listing.
    Scripted(PollingScanner<ScriptedSource>),

    /// Service browse with scripted events.
    ScriptedBrowse(ScriptedBrowseScanner),
}

macro_rules! dispatch {
    ($self:expr, $scanner:ident => $body:expr) => {
        match $self {
            #[cfg(feature = "serial")]
            AnyTransportScanner::Serial($scanner) => $body,
            #[cfg(feature = "pcsc")]
            AnyTransportScanner::Pcsc($scanner) => $body,
            #[cfg(feature = "mdns")]
            AnyTransportScanner::Mdns($scanner) => $body,
            AnyTransportScanner::Scripted($scanner) => $body,
            AnyTransportScanner::ScriptedBrowse($scanner) => $body,
        }
    };
}

impl TransportScanner for AnyTransportScanner {
    fn transport(&self) -> &'static str {
        dispatch!(self, scanner => scanner.transport())
    }

    fn reset(&mut self) {
        dispatch!(self, scanner => scanner.reset())
    }

    async fn run(&mut self, sink: SharedSink, cancel: CancellationToken) {
        dispatch!(self, scanner => scanner.run(sink, cancel).await)
    }
}

impl From<PollingScanner<ScriptedSource>> for AnyTransportScanner {
    fn from(scanner: PollingScanner<ScriptedSource>) -> Self {
        Self::Scripted(scanner)
    }
}

impl From<ScriptedBrowseScanner> for AnyTransportScanner {
    fn from(scanner: ScriptedBrowseScanner) -> Self {
        Self::ScriptedBrowse(scanner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedSource;
    use senseid_core::{DeviceDescriptor, SupportedReader};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(bool, DeviceDescriptor)>>,
    }

    impl DeviceSink for Recorder {
        fn device_added(&self, descriptor: DeviceDescriptor) {
            self.events.lock().unwrap().push((true, descriptor));
        }

        fn device_removed(&self, descriptor: &DeviceDescriptor) {
            self.events.lock().unwrap().push((false, descriptor.clone()));
        }
    }

    #[tokio::test]
    async fn test_poll_once_reports_edges() {
        let (source, handle) = ScriptedSource::new("serial");
        let mut scanner = PollingScanner::new(source, Duration::from_secs(1));
        let recorder = Recorder::default();
        let nur = DeviceDescriptor::new(SupportedReader::Nur, "/dev/ttyACM0");

        handle.attach(nur.clone());
        scanner.poll_once(&recorder).await.unwrap();
        scanner.poll_once(&recorder).await.unwrap();
        handle.unplug("/dev/ttyACM0");
        scanner.poll_once(&recorder).await.unwrap();

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events, vec![(true, nur.clone()), (false, nur)]);
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_devices() {
        let (source, handle) = ScriptedSource::new("pcsc");
        let mut scanner = PollingScanner::new(source, Duration::from_secs(1));
        let recorder = Recorder::default();

        handle.attach(DeviceDescriptor::new(SupportedReader::Acr1552, "ACR1552 PICC 0"));
        scanner.poll_once(&recorder).await.unwrap();

        handle.set_failing(true);
        assert!(scanner.poll_once(&recorder).await.is_err());
        handle.set_failing(false);
        scanner.poll_once(&recorder).await.unwrap();

        assert_eq!(recorder.events.lock().unwrap().len(), 1);
        assert_eq!(handle.polls(), 3);
    }

    #[tokio::test]
    async fn test_reset_replays_present_devices() {
        let (source, handle) = ScriptedSource::new("serial");
        let mut scanner = PollingScanner::new(source, Duration::from_secs(1));
        let recorder = Recorder::default();

        handle.attach(DeviceDescriptor::new(SupportedReader::Red4s, "/dev/ttyUSB0"));
        scanner.poll_once(&recorder).await.unwrap();
        scanner.reset();
        scanner.poll_once(&recorder).await.unwrap();

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|(added, _)| *added));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_retries_until_available() {
        let cancel = CancellationToken::new();
        let started = tokio::time::Instant::now();
        let mut attempts = 0;

        let opened = open_with_retry("mDNS", Duration::from_secs(1), &cancel, || {
            attempts += 1;
            if attempts < 3 {
                Err(ScanError::unavailable("mDNS", "no interface"))
            } else {
                Ok(attempts)
            }
        })
        .await;

        assert_eq!(opened, Some(3));
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_gives_up_on_cancel() {
        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        let mut attempts = 0;

        let (opened, ()) = tokio::join!(
            open_with_retry("mDNS", Duration::from_secs(1), &cancel, || {
                attempts += 1;
                Err::<(), _>(ScanError::unavailable("mDNS", "no interface"))
            }),
            async move {
                tokio::time::sleep(Duration::from_millis(4500)).await;
                stopper.cancel();
            }
        );

        assert_eq!(opened, None);
        assert_eq!(attempts, 5);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let (source, handle) = ScriptedSource::new("serial");
        let mut scanner = AnyTransportScanner::from(PollingScanner::new(
            source,
            Duration::from_millis(10),
        ));
        let recorder: SharedSink = Arc::new(Recorder::default());
        let cancel = CancellationToken::new();

        let stopper = cancel.clone();
        let run = scanner.run(recorder, cancel);
        let stop = async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            stopper.cancel();
        };
        tokio::join!(run, stop);

        assert!(handle.polls() >= 2);
        assert_eq!(scanner.transport(), "serial");
    }
}
