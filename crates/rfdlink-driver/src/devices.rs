//! Enum wrappers for driver dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) are not object-safe,
//! so `Box<dyn ReaderDriver>` is not available. The enum wrappers here
//! provide concrete-type dispatch instead: the session core holds an
//! [`AnyReader`]/[`AnyDiscovery`]/[`AnyScannerGateway`] and matches on the
//! variant, which monomorphizes to direct calls.
//!
//! # Examples
//!
//! ```
//! use rfdlink_driver::devices::AnyReader;
//! use rfdlink_driver::mock::MockReader;
//! use rfdlink_driver::traits::ReaderDriver;
//!
//! #[tokio::main]
//! async fn main() -> rfdlink_driver::Result<()> {
//!     let (reader, _handle) = MockReader::new("RFD4031-G10B700-WR-001");
//!     let mut any_reader = AnyReader::Mock(reader);
//!
//!     any_reader.connect().await?;
//!     assert!(any_reader.is_connected());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use rfdlink_core::{Result, TagRead, TransportKind};

use crate::events::{AppearanceObserver, ReaderEventListener};
use crate::mock::{MockDiscovery, MockReader, MockScanner};
use crate::traits::{DiscoveryChannel, ReaderDriver, ScannerGateway};
use crate::types::{
    AntennaRfConfig, EventSubscriptions, ScannerInfo, ScannerOpcode, SingulationControl,
};

/// A reader found by a transport probe.
///
/// Pairs the advertised display name with the connectable handle. The value
/// lives only for the probe that produced it unless it is selected for a
/// connect attempt, in which case [`into_reader`](DiscoveredDevice::into_reader)
/// hands the reader to the session.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    name: String,
    reader: AnyReader,
}

impl DiscoveredDevice {
    /// Create a discovered-device entry.
    pub fn new(name: impl Into<String>, reader: AnyReader) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }

    /// The device's advertised name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Take ownership of the reader handle for a connect attempt.
    pub fn into_reader(self) -> AnyReader {
        self.reader
    }
}

/// Enum wrapper for reader handle dispatch.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyReader {
    /// Mock reader for development and testing.
    Mock(MockReader),
}

impl ReaderDriver for AnyReader {
    async fn connect(&mut self) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.connect().await,
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.disconnect().await,
        }
    }

    async fn dispose(&mut self) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.dispose().await,
        }
    }

    fn is_connected(&self) -> bool {
        match self {
            Self::Mock(reader) => reader.is_connected(),
        }
    }

    fn host_name(&self) -> String {
        match self {
            Self::Mock(reader) => reader.host_name(),
        }
    }

    fn register_event_listener(&mut self, listener: Arc<dyn ReaderEventListener>) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.register_event_listener(listener),
        }
    }

    fn unregister_event_listener(&mut self) {
        match self {
            Self::Mock(reader) => reader.unregister_event_listener(),
        }
    }

    async fn subscribe_events(&mut self, subscriptions: EventSubscriptions) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.subscribe_events(subscriptions).await,
        }
    }

    async fn read_tags(&mut self, max: u16) -> Result<Vec<TagRead>> {
        match self {
            Self::Mock(reader) => reader.read_tags(max).await,
        }
    }

    async fn inventory_perform(&mut self) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.inventory_perform().await,
        }
    }

    async fn inventory_stop(&mut self) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.inventory_stop().await,
        }
    }

    async fn antenna_rf_config(&mut self, antenna: u16) -> Result<AntennaRfConfig> {
        match self {
            Self::Mock(reader) => reader.antenna_rf_config(antenna).await,
        }
    }

    async fn set_antenna_rf_config(&mut self, antenna: u16, config: AntennaRfConfig) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.set_antenna_rf_config(antenna, config).await,
        }
    }

    async fn singulation_control(&mut self, antenna: u16) -> Result<SingulationControl> {
        match self {
            Self::Mock(reader) => reader.singulation_control(antenna).await,
        }
    }

    async fn set_singulation_control(
        &mut self,
        antenna: u16,
        control: SingulationControl,
    ) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.set_singulation_control(antenna, control).await,
        }
    }
}

/// Enum wrapper for discovery channel dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyDiscovery {
    /// Mock discovery channel for development and testing.
    Mock(MockDiscovery),
}

impl DiscoveryChannel for AnyDiscovery {
    async fn open(&mut self, transport: TransportKind) -> Result<()> {
        match self {
            Self::Mock(channel) => channel.open(transport).await,
        }
    }

    async fn retarget(&mut self, transport: TransportKind) -> Result<()> {
        match self {
            Self::Mock(channel) => channel.retarget(transport).await,
        }
    }

    async fn available_readers(&mut self) -> Result<Vec<DiscoveredDevice>> {
        match self {
            Self::Mock(channel) => channel.available_readers().await,
        }
    }

    fn attach(&mut self, observer: Arc<dyn AppearanceObserver>) {
        match self {
            Self::Mock(channel) => channel.attach(observer),
        }
    }

    fn detach(&mut self) {
        match self {
            Self::Mock(channel) => channel.detach(),
        }
    }

    async fn dispose(&mut self) -> Result<()> {
        match self {
            Self::Mock(channel) => channel.dispose().await,
        }
    }
}

/// Enum wrapper for scanner gateway dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyScannerGateway {
    /// Mock scanner gateway for development and testing.
    Mock(MockScanner),
}

impl ScannerGateway for AnyScannerGateway {
    async fn available_scanners(&mut self) -> Result<Vec<ScannerInfo>> {
        match self {
            Self::Mock(gateway) => gateway.available_scanners().await,
        }
    }

    async fn establish_session(&mut self, scanner_id: u32) -> Result<()> {
        match self {
            Self::Mock(gateway) => gateway.establish_session(scanner_id).await,
        }
    }

    async fn terminate_session(&mut self, scanner_id: u32) -> Result<()> {
        match self {
            Self::Mock(gateway) => gateway.terminate_session(scanner_id).await,
        }
    }

    async fn execute_opcode(
        &mut self,
        opcode: ScannerOpcode,
        xml_args: &str,
        scanner_id: u32,
    ) -> Result<()> {
        match self {
            Self::Mock(gateway) => gateway.execute_opcode(opcode, xml_args, scanner_id).await,
        }
    }
}
