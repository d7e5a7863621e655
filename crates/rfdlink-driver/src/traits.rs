//! Driver boundary trait definitions.
//!
//! These traits establish the contract between the session core and the
//! vendor driver: a reader handle, the transport discovery channel, and the
//! auxiliary barcode-scanner gateway. All device I/O is `async fn` and runs
//! inside the session's command worker, never on a caller-facing thread.
//!
//! # Object safety and dynamic dispatch
//!
//! Native `async fn` methods (Edition 2024 RPITIT) are not object-safe, so
//! `Box<dyn ReaderDriver>` is not available. Use the enum wrappers in
//! [`crate::devices`] for concrete-type dispatch, or generic type
//! parameters:
//!
//! ```no_run
//! use rfdlink_driver::traits::ReaderDriver;
//! use rfdlink_driver::Result;
//!
//! async fn reconnect<R: ReaderDriver>(reader: &mut R) -> Result<()> {
//!     reader.disconnect().await?;
//!     reader.connect().await
//! }
//! ```

#![allow(async_fn_in_trait)]

use std::sync::Arc;

use rfdlink_core::{Result, TagRead, TransportKind};

use crate::devices::DiscoveredDevice;
use crate::events::{AppearanceObserver, ReaderEventListener};
use crate::types::{
    AntennaRfConfig, EventSubscriptions, ScannerInfo, ScannerOpcode, SingulationControl,
};

/// Handle to a single RFID reader device.
///
/// Obtained from a discovery probe as part of a [`DiscoveredDevice`]. A
/// handle starts disconnected; [`connect`](ReaderDriver::connect) is a
/// blocking driver call awaited inside the command worker. Once disposed, a
/// handle accepts no further operations.
pub trait ReaderDriver: Send + Sync {
    /// Establish the connection to the physical reader.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the handle is disposed, or an operation
    /// failure with the driver's status description if the transport cannot
    /// be brought up.
    async fn connect(&mut self) -> Result<()>;

    /// Drop the connection. Safe to call on an already disconnected handle.
    async fn disconnect(&mut self) -> Result<()>;

    /// Release the handle. Terminal; the handle cannot be reconnected.
    async fn dispose(&mut self) -> Result<()>;

    /// Whether the driver currently reports the reader as connected.
    fn is_connected(&self) -> bool;

    /// The reader's advertised host name.
    fn host_name(&self) -> String;

    /// Register the listener that receives hardware events.
    ///
    /// At most one listener may be registered at a time.
    ///
    /// # Errors
    ///
    /// Returns a usage error if a listener is already registered.
    fn register_event_listener(&mut self, listener: Arc<dyn ReaderEventListener>) -> Result<()>;

    /// Remove the registered listener, if any.
    fn unregister_event_listener(&mut self);

    /// Enable or disable hardware notification categories.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the reader is not connected.
    async fn subscribe_events(&mut self, subscriptions: EventSubscriptions) -> Result<()>;

    /// Fetch up to `max` newly read tags buffered on the device.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the reader is not connected, or an
    /// operation failure if the fetch itself fails.
    async fn read_tags(&mut self, max: u16) -> Result<Vec<TagRead>>;

    /// Start a continuous inventory operation.
    async fn inventory_perform(&mut self) -> Result<()>;

    /// Stop a running inventory operation.
    async fn inventory_stop(&mut self) -> Result<()>;

    /// Read the RF configuration block for one antenna.
    async fn antenna_rf_config(&mut self, antenna: u16) -> Result<AntennaRfConfig>;

    /// Write the RF configuration block for one antenna.
    async fn set_antenna_rf_config(&mut self, antenna: u16, config: AntennaRfConfig) -> Result<()>;

    /// Read the singulation control block for one antenna.
    async fn singulation_control(&mut self, antenna: u16) -> Result<SingulationControl>;

    /// Write the singulation control block for one antenna.
    async fn set_singulation_control(
        &mut self,
        antenna: u16,
        control: SingulationControl,
    ) -> Result<()>;
}

/// The transport discovery channel.
///
/// One channel instance serves the whole session: it is opened on the first
/// transport of the priority list, re-targeted for each subsequent
/// transport, and disposed exactly once when the session is disposed.
pub trait DiscoveryChannel: Send + Sync {
    /// Initialize the channel on its first transport.
    ///
    /// # Errors
    ///
    /// Returns a discovery error if the channel cannot be brought up.
    async fn open(&mut self, transport: TransportKind) -> Result<()>;

    /// Point an already open channel at a different transport.
    ///
    /// # Errors
    ///
    /// Returns a discovery error if the channel was never opened or has
    /// been disposed.
    async fn retarget(&mut self, transport: TransportKind) -> Result<()>;

    /// Query the readers currently visible on the channel's transport.
    ///
    /// An empty list is a normal outcome ("no devices found"), distinct
    /// from a discovery error (invalid channel state).
    async fn available_readers(&mut self) -> Result<Vec<DiscoveredDevice>>;

    /// Attach the observer notified of reader appearance/disappearance.
    fn attach(&mut self, observer: Arc<dyn AppearanceObserver>);

    /// Detach the appearance observer, if any.
    fn detach(&mut self);

    /// Release the discovery resource. Terminal for this channel.
    async fn dispose(&mut self) -> Result<()>;
}

/// Gateway to the auxiliary barcode-scanner SDK.
///
/// The session only correlates one scanner to the connected reader (by
/// advertised name containing the reader's host name), tracks the numeric
/// session id, and terminates that session during disconnect.
pub trait ScannerGateway: Send + Sync {
    /// List the scanners the gateway can currently see.
    async fn available_scanners(&mut self) -> Result<Vec<ScannerInfo>>;

    /// Establish a communication session with a scanner.
    async fn establish_session(&mut self, scanner_id: u32) -> Result<()>;

    /// Terminate a previously established session. Best-effort; terminating
    /// an unknown session is not an error.
    async fn terminate_session(&mut self, scanner_id: u32) -> Result<()>;

    /// Execute a command opcode against an established session.
    ///
    /// # Errors
    ///
    /// Returns a usage error if no session is established for the id.
    async fn execute_opcode(
        &mut self,
        opcode: ScannerOpcode,
        xml_args: &str,
        scanner_id: u32,
    ) -> Result<()>;
}
