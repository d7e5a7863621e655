//! Mock transport discovery channel.
//!
//! Simulates the vendor driver's discovery machinery: readers are placed on
//! specific transports through the paired [`MockDiscoveryHandle`], probes are
//! recorded so tests can assert which transports were queried, and
//! appearance/disappearance notifications can be fired as the driver would
//! on its own callback thread.

use std::sync::{Arc, Mutex};

use rfdlink_core::{Error, Result, TransportKind};
use tracing::debug;

use crate::devices::{AnyReader, DiscoveredDevice};
use crate::events::AppearanceObserver;
use crate::mock::reader::MockReaderHandle;
use crate::traits::DiscoveryChannel;

#[derive(Default)]
struct DiscoveryState {
    current: Option<TransportKind>,
    disposed: bool,
    observer: Option<Arc<dyn AppearanceObserver>>,
    placements: Vec<(TransportKind, MockReaderHandle)>,
    probe_log: Vec<TransportKind>,
    fail_next_query: Option<String>,
}

/// Mock discovery channel for testing and development.
///
/// Created together with a [`MockDiscoveryHandle`] that shares its state:
///
/// ```
/// use rfdlink_core::TransportKind;
/// use rfdlink_driver::mock::{MockDiscovery, MockReader};
/// use rfdlink_driver::traits::DiscoveryChannel;
///
/// #[tokio::main]
/// async fn main() -> rfdlink_driver::Result<()> {
///     let (_, reader) = MockReader::new("RFD4031-G10B700-WR-001");
///     let (mut discovery, handle) = MockDiscovery::new();
///     handle.place_reader(TransportKind::Usb, &reader);
///
///     discovery.open(TransportKind::Usb).await?;
///     let devices = discovery.available_readers().await?;
///     assert_eq!(devices.len(), 1);
///     Ok(())
/// }
/// ```
pub struct MockDiscovery {
    state: Arc<Mutex<DiscoveryState>>,
}

impl MockDiscovery {
    /// Create a new mock discovery channel with no visible readers.
    pub fn new() -> (Self, MockDiscoveryHandle) {
        let state = Arc::new(Mutex::new(DiscoveryState::default()));
        let discovery = Self {
            state: Arc::clone(&state),
        };
        let handle = MockDiscoveryHandle { state };
        (discovery, handle)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DiscoveryState> {
        self.state.lock().expect("mock discovery state poisoned")
    }
}

impl std::fmt::Debug for MockDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDiscovery").finish_non_exhaustive()
    }
}

impl DiscoveryChannel for MockDiscovery {
    async fn open(&mut self, transport: TransportKind) -> Result<()> {
        let mut state = self.lock();
        if state.disposed {
            return Err(Error::discovery("discovery channel is disposed"));
        }
        debug!(%transport, "mock discovery channel opened");
        state.current = Some(transport);
        Ok(())
    }

    async fn retarget(&mut self, transport: TransportKind) -> Result<()> {
        let mut state = self.lock();
        if state.disposed {
            return Err(Error::discovery("discovery channel is disposed"));
        }
        if state.current.is_none() {
            return Err(Error::discovery("discovery channel was never opened"));
        }
        state.current = Some(transport);
        Ok(())
    }

    async fn available_readers(&mut self) -> Result<Vec<DiscoveredDevice>> {
        let mut state = self.lock();
        if state.disposed {
            return Err(Error::discovery("discovery channel is disposed"));
        }
        let Some(current) = state.current else {
            return Err(Error::discovery("discovery channel was never opened"));
        };
        if let Some(message) = state.fail_next_query.take() {
            return Err(Error::discovery(message));
        }
        state.probe_log.push(current);
        let devices = state
            .placements
            .iter()
            .filter(|(transport, _)| *transport == current || current == TransportKind::All)
            .map(|(_, handle)| {
                DiscoveredDevice::new(handle.name(), AnyReader::Mock(handle.reader()))
            })
            .collect();
        Ok(devices)
    }

    fn attach(&mut self, observer: Arc<dyn AppearanceObserver>) {
        self.lock().observer = Some(observer);
    }

    fn detach(&mut self) {
        self.lock().observer = None;
    }

    async fn dispose(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.disposed = true;
        state.observer = None;
        state.current = None;
        Ok(())
    }
}

/// Handle for controlling a [`MockDiscovery`] from test code.
///
/// Notification methods invoke the attached observer synchronously on the
/// calling thread, standing in for the driver's callback thread.
#[derive(Clone)]
pub struct MockDiscoveryHandle {
    state: Arc<Mutex<DiscoveryState>>,
}

impl MockDiscoveryHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, DiscoveryState> {
        self.state.lock().expect("mock discovery state poisoned")
    }

    fn observer(&self) -> Option<Arc<dyn AppearanceObserver>> {
        self.lock().observer.clone()
    }

    /// Make a reader visible on the given transport.
    ///
    /// The reader appears in probes of that transport (and of
    /// [`TransportKind::All`]); each probe mints a fresh device handle over
    /// the reader's shared state.
    pub fn place_reader(&self, transport: TransportKind, reader: &MockReaderHandle) {
        self.lock().placements.push((transport, reader.clone()));
    }

    /// Remove every placement of the named reader.
    pub fn remove_reader(&self, name: &str) {
        self.lock()
            .placements
            .retain(|(_, handle)| handle.name() != name);
    }

    /// Make the next `available_readers` query fail with a discovery error.
    pub fn fail_next_query(&self, message: impl Into<String>) {
        self.lock().fail_next_query = Some(message.into());
    }

    /// The transports queried so far, in probe order.
    pub fn probe_log(&self) -> Vec<TransportKind> {
        self.lock().probe_log.clone()
    }

    /// The transport the channel currently targets, if open.
    pub fn current_transport(&self) -> Option<TransportKind> {
        self.lock().current
    }

    /// Whether an appearance observer is attached.
    pub fn has_observer(&self) -> bool {
        self.lock().observer.is_some()
    }

    /// Whether the channel has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    /// Fire a reader-appeared notification at the attached observer.
    pub fn announce_appearance(&self, name: &str) {
        if let Some(observer) = self.observer() {
            observer.reader_appeared(name);
        }
    }

    /// Fire a reader-disappeared notification at the attached observer.
    pub fn announce_disappearance(&self, name: &str) {
        if let Some(observer) = self.observer() {
            observer.reader_disappeared(name);
        }
    }
}

impl std::fmt::Debug for MockDiscoveryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDiscoveryHandle").finish_non_exhaustive()
    }
}
