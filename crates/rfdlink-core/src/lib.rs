//! Shared domain types for the rfdlink handheld RFID reader session manager.
//!
//! This crate carries the vocabulary used across the workspace: transport
//! kinds and their priority ordering, tag read data, session configuration,
//! and the common error taxonomy. It has no I/O of its own.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::SessionConfig;
pub use error::{Error, Result};
pub use types::{TagRead, TransportKind};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
