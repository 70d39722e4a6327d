//! Reader capability contract.
//!
//! Every vendor backend implements [`SenseidReader`]. The trait uses native
//! `async fn` methods (Rust 1.90 + Edition 2024 RPITIT).

#![allow(async_fn_in_trait)]

use crate::error::Result;
use senseid_core::{ReaderDetails, SupportedReader, TagRecord};
use tokio::sync::mpsc;

/// Uniform reader contract.
///
/// Implementations apply the same normalization policy regardless of the
/// vendor behind them:
///
/// - tx power is clamped into the reader's own `[min_tx_power, max_tx_power]`
///   with a warning, never rejected;
/// - an antenna configuration always keeps at least one antenna enabled;
/// - a reader that does not answer makes `connect` return `Ok(false)`.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. For runtime selection by kind, use
/// [`AnyReader`](crate::devices::AnyReader).
///
/// # Examples
///
/// ```no_run
/// use senseid_readers::traits::SenseidReader;
/// use senseid_readers::Result;
/// use tokio::sync::mpsc;
///
/// async fn first_tag<R: SenseidReader>(reader: &mut R, address: &str) -> Result<Option<String>> {
///     if !reader.connect(address).await? {
///         return Ok(None);
///     }
///     reader.set_tx_power(20.0).await?;
///
///     let (tx, mut rx) = mpsc::channel(16);
///     reader.start_inventory_async(tx).await?;
///     let tag = rx.recv().await;
///     reader.stop_inventory_async().await?;
///     reader.disconnect().await?;
///
///     Ok(tag.map(|t| t.id))
/// }
/// ```
pub trait SenseidReader: Send {
    /// Reader kind this implementation drives.
    fn kind(&self) -> SupportedReader;

    /// Whether a session is currently open.
    fn is_connected(&self) -> bool;

    /// Open a session.
    ///
    /// Returns `Ok(false)` when the device cannot be reached or refuses the
    /// session setup. Connecting drops any cached [`ReaderDetails`] and
    /// fetches them again.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InvalidAddress`](crate::HardwareError::InvalidAddress)
    /// for an empty address.
    async fn connect(&mut self, address: &str) -> Result<bool>;

    /// Close the session. Safe to call when not connected.
    async fn disconnect(&mut self) -> Result<()>;

    /// Static reader facts, queried once per session and cached.
    async fn get_details(&mut self) -> Result<ReaderDetails>;

    /// Current transmit power in dBm.
    async fn get_tx_power(&mut self) -> Result<f64>;

    /// Set the transmit power, clamped into the reader's range.
    ///
    /// Returns the power actually applied.
    async fn set_tx_power(&mut self, dbm: f64) -> Result<f64>;

    /// Enabled state of each antenna port.
    async fn get_antenna_config(&mut self) -> Result<Vec<bool>>;

    /// Enable or disable antenna ports.
    ///
    /// Returns the configuration actually applied.
    async fn set_antenna_config(&mut self, config: &[bool]) -> Result<Vec<bool>>;

    /// Start continuous inventory, delivering one record per detected tag.
    ///
    /// Delivery is best-effort: records are dropped while `sink` is full.
    async fn start_inventory_async(&mut self, sink: mpsc::Sender<TagRecord>) -> Result<()>;

    /// Stop continuous inventory.
    async fn stop_inventory_async(&mut self) -> Result<()>;
}
