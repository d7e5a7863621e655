//! Driver boundary for the rfdlink session manager.
//!
//! This crate defines the traits through which the session core talks to the
//! vendor's reader driver, the discovery machinery, and the auxiliary
//! barcode-scanner gateway, without depending on any concrete SDK. Mock
//! implementations with programmatic control handles live in [`mock`] so the
//! session layer can be exercised without physical hardware.
//!
//! # Design
//!
//! - **Async-first**: device operations are native `async fn` trait methods
//!   (Edition 2024 RPITIT); no `async_trait` macro.
//! - **Enum dispatch**: `async fn` traits are not object-safe, so the
//!   [`devices`] module provides `AnyReader`/`AnyDiscovery`/
//!   `AnyScannerGateway` wrappers for concrete-type dispatch.
//! - **Callback capability traits**: hardware-originated events arrive
//!   through the small [`ReaderEventListener`] and [`AppearanceObserver`]
//!   traits. Implementations must be non-blocking — the driver invokes them
//!   on its own thread.
//!
//! # Failure categories
//!
//! Driver failures split into usage errors (caller misuse, e.g. configuring
//! a disconnected reader) and operation failures (device or transport fault,
//! carrying a human-readable status description). Discovery-channel faults
//! are a third category that aborts the current probe. All three are
//! variants of [`rfdlink_core::Error`].

pub mod devices;
pub mod events;
pub mod mock;
pub mod traits;
pub mod types;

pub use devices::{AnyDiscovery, AnyReader, AnyScannerGateway, DiscoveredDevice};
pub use events::{AppearanceObserver, ReaderEventListener, StatusEvent, TriggerEvent};
pub use traits::{DiscoveryChannel, ReaderDriver, ScannerGateway};
pub use types::{
    AntennaRfConfig, EventSubscriptions, InventoryState, ScannerInfo, ScannerOpcode,
    SingulationControl, SingulationSession, SlFlag,
};

pub use rfdlink_core::{Error, Result};
