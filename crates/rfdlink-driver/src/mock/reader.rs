//! Mock RFID reader implementation for testing and development.
//!
//! The mock reader simulates the vendor driver's reader handle: connect
//! latency, injected connect failures, buffered tag reads, and hardware
//! event callbacks can all be driven programmatically through the paired
//! [`MockReaderHandle`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rfdlink_core::{Error, Result, TagRead};

use crate::events::{ReaderEventListener, StatusEvent, TriggerEvent};
use crate::traits::ReaderDriver;
use crate::types::{AntennaRfConfig, EventSubscriptions, SingulationControl};

#[derive(Default)]
struct ReaderState {
    connected: bool,
    disposed: bool,
    listener: Option<Arc<dyn ReaderEventListener>>,
    subscriptions: EventSubscriptions,
    pending_tags: VecDeque<TagRead>,
    connect_delay: Duration,
    fail_connect_with: Option<String>,
    fail_next_tag_fetch: bool,
    inventory_running: bool,
    antenna_config: AntennaRfConfig,
    singulation: SingulationControl,
}

/// Mock reader handle for testing and development.
///
/// Created together with a [`MockReaderHandle`] that shares its state, so
/// tests can observe and drive the reader from outside the session:
///
/// ```
/// use rfdlink_driver::mock::MockReader;
/// use rfdlink_driver::traits::ReaderDriver;
///
/// #[tokio::main]
/// async fn main() -> rfdlink_driver::Result<()> {
///     let (mut reader, handle) = MockReader::new("RFD4031-G10B700-WR-001");
///
///     reader.connect().await?;
///     assert!(handle.is_connected());
///
///     reader.disconnect().await?;
///     assert!(!handle.is_connected());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct MockReader {
    name: String,
    state: Arc<Mutex<ReaderState>>,
}

impl MockReader {
    /// Create a new mock reader with the given advertised name.
    pub fn new(name: impl Into<String>) -> (Self, MockReaderHandle) {
        let name = name.into();
        let state = Arc::new(Mutex::new(ReaderState::default()));
        let reader = Self {
            name: name.clone(),
            state: Arc::clone(&state),
        };
        let handle = MockReaderHandle { name, state };
        (reader, handle)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ReaderState> {
        self.state.lock().expect("mock reader state poisoned")
    }
}

impl std::fmt::Debug for MockReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockReader")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ReaderDriver for MockReader {
    async fn connect(&mut self) -> Result<()> {
        let (delay, failure) = {
            let mut state = self.lock();
            if state.disposed {
                return Err(Error::usage("connect on a disposed reader handle"));
            }
            if state.connected {
                return Ok(());
            }
            (state.connect_delay, state.fail_connect_with.take())
        };

        // Simulated transport bring-up latency; kept outside the lock.
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(description) = failure {
            return Err(Error::operation_failure(description));
        }

        self.lock().connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.connected = false;
        state.inventory_running = false;
        Ok(())
    }

    async fn dispose(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.connected = false;
        state.disposed = true;
        state.listener = None;
        state.inventory_running = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        let state = self.lock();
        state.connected && !state.disposed
    }

    fn host_name(&self) -> String {
        self.name.clone()
    }

    fn register_event_listener(&mut self, listener: Arc<dyn ReaderEventListener>) -> Result<()> {
        let mut state = self.lock();
        if state.listener.is_some() {
            return Err(Error::usage("event listener already registered"));
        }
        state.listener = Some(listener);
        Ok(())
    }

    fn unregister_event_listener(&mut self) {
        self.lock().listener = None;
    }

    async fn subscribe_events(&mut self, subscriptions: EventSubscriptions) -> Result<()> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::usage("subscribe_events on a disconnected reader"));
        }
        state.subscriptions = subscriptions;
        Ok(())
    }

    async fn read_tags(&mut self, max: u16) -> Result<Vec<TagRead>> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::usage("read_tags on a disconnected reader"));
        }
        if state.fail_next_tag_fetch {
            state.fail_next_tag_fetch = false;
            return Err(Error::operation_failure("tag fetch failed"));
        }
        let count = usize::from(max).min(state.pending_tags.len());
        Ok(state.pending_tags.drain(..count).collect())
    }

    async fn inventory_perform(&mut self) -> Result<()> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::usage("inventory_perform on a disconnected reader"));
        }
        state.inventory_running = true;
        Ok(())
    }

    async fn inventory_stop(&mut self) -> Result<()> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::usage("inventory_stop on a disconnected reader"));
        }
        state.inventory_running = false;
        Ok(())
    }

    async fn antenna_rf_config(&mut self, _antenna: u16) -> Result<AntennaRfConfig> {
        let state = self.lock();
        if !state.connected {
            return Err(Error::usage("antenna_rf_config on a disconnected reader"));
        }
        Ok(state.antenna_config)
    }

    async fn set_antenna_rf_config(&mut self, _antenna: u16, config: AntennaRfConfig) -> Result<()> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::usage("set_antenna_rf_config on a disconnected reader"));
        }
        state.antenna_config = config;
        Ok(())
    }

    async fn singulation_control(&mut self, _antenna: u16) -> Result<SingulationControl> {
        let state = self.lock();
        if !state.connected {
            return Err(Error::usage("singulation_control on a disconnected reader"));
        }
        Ok(state.singulation)
    }

    async fn set_singulation_control(
        &mut self,
        _antenna: u16,
        control: SingulationControl,
    ) -> Result<()> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::usage("set_singulation_control on a disconnected reader"));
        }
        state.singulation = control;
        Ok(())
    }
}

/// Handle for controlling a [`MockReader`] from test code.
///
/// Event-emitting methods invoke the registered listener synchronously on
/// the calling thread, standing in for the vendor driver's callback thread.
#[derive(Clone)]
pub struct MockReaderHandle {
    name: String,
    state: Arc<Mutex<ReaderState>>,
}

impl MockReaderHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, ReaderState> {
        self.state.lock().expect("mock reader state poisoned")
    }

    fn listener(&self) -> Option<Arc<dyn ReaderEventListener>> {
        self.lock().listener.clone()
    }

    /// Mint another view over this reader's shared state.
    ///
    /// Used by the mock discovery channel, which hands out a fresh
    /// [`MockReader`] per probe while the test keeps one handle.
    pub fn reader(&self) -> MockReader {
        MockReader {
            name: self.name.clone(),
            state: Arc::clone(&self.state),
        }
    }

    /// The reader's advertised name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delay applied to the next (and subsequent) connect calls.
    pub fn set_connect_delay(&self, delay: Duration) {
        self.lock().connect_delay = delay;
    }

    /// Make the next connect call fail with the given status description.
    pub fn fail_next_connect(&self, description: impl Into<String>) {
        self.lock().fail_connect_with = Some(description.into());
    }

    /// Make the next tag fetch fail with an operation failure.
    pub fn fail_next_tag_fetch(&self) {
        self.lock().fail_next_tag_fetch = true;
    }

    /// Buffer tag reads on the device, available to the next `read_tags`.
    pub fn queue_tags(&self, tags: impl IntoIterator<Item = TagRead>) {
        self.lock().pending_tags.extend(tags);
    }

    /// Fire a read-notify callback, as the driver does when buffered tag
    /// reads become available.
    pub fn notify_read(&self) {
        let (listener, enabled) = {
            let state = self.lock();
            (state.listener.clone(), state.subscriptions.tag_read)
        };
        if let Some(listener) = listener
            && enabled
        {
            listener.read_notify();
        }
    }

    /// Fire a trigger-pressed status callback.
    pub fn press_trigger(&self) {
        self.emit_trigger(TriggerEvent::Pressed);
    }

    /// Fire a trigger-released status callback.
    pub fn release_trigger(&self) {
        self.emit_trigger(TriggerEvent::Released);
    }

    fn emit_trigger(&self, event: TriggerEvent) {
        let (listener, enabled) = {
            let state = self.lock();
            (state.listener.clone(), state.subscriptions.handheld_trigger)
        };
        if let Some(listener) = listener
            && enabled
        {
            listener.status_notify(StatusEvent::HandheldTrigger(event));
        }
    }

    /// Fire a reader-side disconnection status callback.
    pub fn emit_disconnect(&self) {
        let (listener, enabled) = {
            let state = self.lock();
            (state.listener.clone(), state.subscriptions.reader_disconnect)
        };
        if let Some(listener) = listener
            && enabled
        {
            listener.status_notify(StatusEvent::Disconnection);
        }
    }

    /// Fire an arbitrary status callback the session does not recognize.
    pub fn emit_status(&self, code: u32) {
        if let Some(listener) = self.listener() {
            listener.status_notify(StatusEvent::Other(code));
        }
    }

    /// Whether the reader currently reports connected.
    pub fn is_connected(&self) -> bool {
        let state = self.lock();
        state.connected && !state.disposed
    }

    /// Whether the reader handle has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    /// Whether an event listener is currently registered.
    pub fn has_listener(&self) -> bool {
        self.lock().listener.is_some()
    }

    /// The notification subscriptions last written by the session.
    pub fn subscriptions(&self) -> EventSubscriptions {
        self.lock().subscriptions
    }

    /// Whether an inventory operation is running.
    pub fn inventory_running(&self) -> bool {
        self.lock().inventory_running
    }

    /// The antenna RF configuration last written by the session.
    pub fn antenna_config(&self) -> AntennaRfConfig {
        self.lock().antenna_config
    }

    /// The singulation control last written by the session.
    pub fn singulation(&self) -> SingulationControl {
        self.lock().singulation
    }
}

impl std::fmt::Debug for MockReaderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockReaderHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let (mut reader, handle) = MockReader::new("RFD4031-G10B700-WR-001");
        assert!(!reader.is_connected());

        reader.connect().await.unwrap();
        assert!(reader.is_connected());
        assert!(handle.is_connected());

        reader.disconnect().await.unwrap();
        assert!(!handle.is_connected());
    }

    #[tokio::test]
    async fn test_connect_failure_is_operation_failure() {
        let (mut reader, handle) = MockReader::new("RFD4031-G10B700-WR-001");
        handle.fail_next_connect("RFID_READER_REGION_NOT_CONFIGURED");

        let err = reader.connect().await.unwrap_err();
        assert!(matches!(err, Error::OperationFailure { .. }));
        assert_eq!(err.status_description(), "RFID_READER_REGION_NOT_CONFIGURED");
        assert!(!reader.is_connected());

        // The failure is one-shot; a retry succeeds.
        reader.connect().await.unwrap();
        assert!(reader.is_connected());
    }

    #[tokio::test]
    async fn test_connect_after_dispose_is_usage_error() {
        let (mut reader, _handle) = MockReader::new("RFD4031-G10B700-WR-001");
        reader.dispose().await.unwrap();

        let err = reader.connect().await.unwrap_err();
        assert!(matches!(err, Error::Usage { .. }));
    }

    #[tokio::test]
    async fn test_read_tags_bounded_and_draining() {
        let (mut reader, handle) = MockReader::new("RFD4031-G10B700-WR-001");
        reader.connect().await.unwrap();

        handle.queue_tags((0..5).map(|i| TagRead::new(format!("EPC{:02}", i), -50)));

        let batch = reader.read_tags(3).await.unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].epc, "EPC00");

        let rest = reader.read_tags(100).await.unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].epc, "EPC03");

        assert!(reader.read_tags(100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_tags_requires_connection() {
        let (mut reader, _handle) = MockReader::new("RFD4031-G10B700-WR-001");
        let err = reader.read_tags(100).await.unwrap_err();
        assert!(matches!(err, Error::Usage { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_listener_registration_rejected() {
        struct Nop;
        impl ReaderEventListener for Nop {
            fn read_notify(&self) {}
            fn status_notify(&self, _event: StatusEvent) {}
        }

        let (mut reader, handle) = MockReader::new("RFD4031-G10B700-WR-001");
        reader.register_event_listener(Arc::new(Nop)).unwrap();
        assert!(handle.has_listener());

        let err = reader.register_event_listener(Arc::new(Nop)).unwrap_err();
        assert!(matches!(err, Error::Usage { .. }));

        reader.unregister_event_listener();
        assert!(!handle.has_listener());
    }

    #[tokio::test]
    async fn test_events_respect_subscriptions() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Default)]
        struct Counter {
            reads: AtomicUsize,
            statuses: AtomicUsize,
        }
        impl ReaderEventListener for Counter {
            fn read_notify(&self) {
                self.reads.fetch_add(1, Ordering::SeqCst);
            }
            fn status_notify(&self, _event: StatusEvent) {
                self.statuses.fetch_add(1, Ordering::SeqCst);
            }
        }

        let (mut reader, handle) = MockReader::new("RFD4031-G10B700-WR-001");
        reader.connect().await.unwrap();
        let counter = Arc::new(Counter::default());
        reader.register_event_listener(counter.clone()).unwrap();

        // No subscriptions yet: nothing is delivered.
        handle.notify_read();
        handle.press_trigger();
        assert_eq!(counter.reads.load(Ordering::SeqCst), 0);
        assert_eq!(counter.statuses.load(Ordering::SeqCst), 0);

        reader
            .subscribe_events(EventSubscriptions {
                handheld_trigger: true,
                tag_read: true,
                attach_tag_data: false,
                reader_disconnect: true,
            })
            .await
            .unwrap();

        handle.notify_read();
        handle.press_trigger();
        handle.emit_disconnect();
        assert_eq!(counter.reads.load(Ordering::SeqCst), 1);
        assert_eq!(counter.statuses.load(Ordering::SeqCst), 2);
    }
}
