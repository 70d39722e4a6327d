//! Core types shared by the Senseid reader abstraction crates.
//!
//! This crate holds the identity and record types that cross every layer:
//! device descriptors produced by discovery, capability snapshots reported by
//! connected readers, and tag records produced by the payload decoders.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
