//! Session management core for the rfdlink handheld RFID reader.
//!
//! This crate coordinates three independently-timed actor classes — caller
//! requests, driver callback threads, and the periodic connecting timer —
//! against one shared, fault-prone device handle:
//!
//! - [`CommandSerializer`]: a single-worker FIFO queue through which every
//!   state-mutating operation passes. No two operations run concurrently,
//!   so connection state needs no locking.
//! - [`TransportProber`] / [`DeviceSelector`]: ordered transport fallback
//!   discovery and prefix-based disambiguation.
//! - [`ConnectionManager`](manager::ConnectionManager): the
//!   connect/disconnect state machine, owned exclusively by the worker.
//! - [`EventDispatcher`]: re-posts driver callbacks onto the worker without
//!   blocking the driver's callback thread.
//! - [`ReaderSession`]: the public handle. Explicitly constructed,
//!   explicitly owned; all of its operations submit to the worker and
//!   return immediately.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rfdlink_core::{SessionConfig, TagRead};
//! use rfdlink_driver::mock::{MockDiscovery, MockScanner};
//! use rfdlink_driver::{AnyDiscovery, AnyScannerGateway};
//! use rfdlink_session::{ReaderSession, SessionObserver};
//!
//! struct LogObserver;
//!
//! impl SessionObserver for LogObserver {
//!     fn status_changed(&self, text: &str, connected: bool) {
//!         println!("{text} (connected: {connected})");
//!     }
//!     fn tag_batch(&self, _reads: &[TagRead]) {}
//!     fn trigger_changed(&self, _pressed: bool) {}
//!     fn notice(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (discovery, _) = MockDiscovery::new();
//!     let (scanner, _) = MockScanner::new();
//!     let session = ReaderSession::new(
//!         SessionConfig::default(),
//!         AnyDiscovery::Mock(discovery),
//!         AnyScannerGateway::Mock(scanner),
//!         Arc::new(LogObserver),
//!     );
//!     session.connect();
//!     session.flush().await;
//!     session.shutdown().await;
//! }
//! ```

pub mod discovery;
pub mod dispatch;
pub mod manager;
pub mod observer;
pub mod serializer;
pub mod state;

pub use discovery::{DeviceSelector, TransportProber};
pub use dispatch::EventDispatcher;
pub use manager::ReaderSession;
pub use observer::SessionObserver;
pub use serializer::{CommandSerializer, CommandSubmitter};
pub use state::SessionState;

pub use rfdlink_core::{Error, Result};
