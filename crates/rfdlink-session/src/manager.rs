//! Connection manager and the public session handle.
//!
//! # Architecture
//!
//! The [`ConnectionManager`] owns the device handle and every piece of
//! mutable connection state. It is in turn owned by the
//! [`CommandSerializer`] worker, so all of its methods run strictly one at
//! a time. The [`ReaderSession`] handle is the public face: each of its
//! operations submits a unit of work to the worker and returns immediately.
//!
//! ```text
//! ┌────────────┐ submit  ┌───────────────────┐
//! │ UI / timer │────────►│                   │      ┌───────────────────┐
//! └────────────┘         │  CommandSerializer│─────►│ ConnectionManager │
//! ┌────────────┐ submit  │  (FIFO worker)    │      │  + device handle  │
//! │ driver     │────────►│                   │      └───────────────────┘
//! │ callbacks  │         └───────────────────┘               │
//! └────────────┘                                             ▼
//!        ▲                                            SessionObserver
//!        └── EventDispatcher re-posts, never blocks
//! ```
//!
//! Reads of connectivity from outside the worker go through an atomic
//! mirror and are best-effort; only the worker's own sequential view is
//! authoritative for mutating decisions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rfdlink_core::constants::{DEFAULT_ANTENNA, DEFAULT_RF_MODE_TABLE_INDEX, DEFAULT_TARI};
use rfdlink_core::{Error, Result, SessionConfig};
use rfdlink_driver::devices::{AnyDiscovery, AnyReader, AnyScannerGateway};
use rfdlink_driver::events::ReaderEventListener;
use rfdlink_driver::traits::{DiscoveryChannel, ReaderDriver, ScannerGateway};
use rfdlink_driver::types::{
    EventSubscriptions, InventoryState, ScannerOpcode, SingulationSession, SlFlag,
};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::discovery::{DeviceSelector, TransportProber};
use crate::dispatch::EventDispatcher;
use crate::observer::SessionObserver;
use crate::serializer::CommandSerializer;
use crate::state::SessionState;

/// The single live connection: the device handle plus its host name.
struct ActiveConnection {
    reader: AnyReader,
    host_name: String,
}

/// Periodic "still connecting" notification.
///
/// Runs as its own task so the blocking connect call inside the worker
/// does not starve it; cancelled synchronously in the same worker step
/// that leaves `Connecting`, so no stale tick can follow the resolution
/// report.
struct ConnectingTicker {
    task: JoinHandle<()>,
}

impl ConnectingTicker {
    fn start(observer: Arc<dyn SessionObserver>, interval: Duration) -> Self {
        let task = tokio::spawn(async move {
            let started = Instant::now();
            loop {
                tokio::time::sleep(interval).await;
                let seconds = started.elapsed().as_secs();
                observer.status_changed(&format!("connecting... {seconds} s"), false);
            }
        });
        Self { task }
    }

    fn cancel(self) {
        self.task.abort();
    }
}

/// Owns the device handle and the connect/disconnect state machine.
///
/// Exclusively owned by the command worker; every method is a worker
/// operation and therefore runs serialized against all others. Constructed
/// through [`ReaderSession::new`].
pub struct ConnectionManager {
    config: SessionConfig,
    discovery: AnyDiscovery,
    scanner: AnyScannerGateway,
    observer: Arc<dyn SessionObserver>,
    prober: TransportProber,
    selector: DeviceSelector,
    state: SessionState,
    active: Option<ActiveConnection>,
    listener: Option<Arc<dyn ReaderEventListener>>,
    scanner_session: Option<u32>,
    connected_mirror: Arc<AtomicBool>,
}

impl ConnectionManager {
    fn new(
        config: SessionConfig,
        discovery: AnyDiscovery,
        scanner: AnyScannerGateway,
        observer: Arc<dyn SessionObserver>,
        connected_mirror: Arc<AtomicBool>,
    ) -> Self {
        let selector = DeviceSelector::new(config.reader_name_prefix.clone());
        Self {
            config,
            discovery,
            scanner,
            observer,
            prober: TransportProber::new(),
            selector,
            state: SessionState::Idle,
            active: None,
            listener: None,
            scanner_session: None,
            connected_mirror,
        }
    }

    pub(crate) fn attach_dispatcher(&mut self, dispatcher: Arc<EventDispatcher>) {
        self.listener = Some(Arc::clone(&dispatcher) as Arc<dyn ReaderEventListener>);
        self.discovery.attach(dispatcher);
    }

    fn transition(&mut self, to: SessionState) -> Result<()> {
        if !self.state.can_transition_to(&to) {
            return Err(Error::InvalidStateTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }
        debug!(from = %self.state, to = %to, "session state transition");
        self.state = to;
        self.connected_mirror
            .store(matches!(to, SessionState::Connected), Ordering::SeqCst);
        Ok(())
    }

    /// Discover, select, connect, and wire up the event listener.
    pub(crate) async fn do_connect(&mut self) {
        match self.state {
            SessionState::Disposed => {
                warn!("connect requested on a disposed session");
                return;
            }
            SessionState::Connected => {
                // Reconnecting while connected is a no-op that re-reports
                // the current status.
                let name = self
                    .active
                    .as_ref()
                    .map(|active| active.host_name.clone())
                    .unwrap_or_default();
                self.observer
                    .status_changed(&format!("connected: {name}"), true);
                return;
            }
            SessionState::Idle => {}
            other => {
                warn!(state = %other, "connect requested in unexpected state");
                return;
            }
        }

        let devices = match self
            .prober
            .discover(&mut self.discovery, &self.config.transport_priority)
            .await
        {
            Ok(devices) => devices,
            Err(err) => {
                error!(error = %err, "discovery failed");
                self.observer.notice(&err.status_description());
                return;
            }
        };
        if devices.is_empty() {
            self.observer.notice("no readers found");
            return;
        }
        let Some(device) = self.selector.select(devices) else {
            self.observer
                .notice("no reader matched the expected name prefix");
            return;
        };

        let name = device.name().to_owned();
        if let Err(err) = self.transition(SessionState::Connecting) {
            error!(error = %err, "connect attempt rejected");
            return;
        }

        let started = Instant::now();
        let ticker =
            ConnectingTicker::start(Arc::clone(&self.observer), self.config.connecting_tick);
        let mut reader = device.into_reader();
        let result = reader.connect().await;
        ticker.cancel();

        match result {
            Ok(()) => {
                if let Err(err) = self.finish_connect(&mut reader).await {
                    // Partial connect must leave no dangling listener
                    // registration.
                    error!(error = %err, reader = %name, "connect setup failed");
                    reader.unregister_event_listener();
                    if let Err(err) = reader.disconnect().await {
                        warn!(error = %err, reader = %name, "rollback disconnect failed");
                    }
                    if let Err(err) = reader.dispose().await {
                        warn!(error = %err, reader = %name, "rollback dispose failed");
                    }
                    let _ = self.transition(SessionState::Idle);
                    self.observer.status_changed(&err.status_description(), false);
                    return;
                }
                let elapsed = started.elapsed().as_millis();
                self.active = Some(ActiveConnection {
                    reader,
                    host_name: name.clone(),
                });
                let _ = self.transition(SessionState::Connected);
                info!(reader = %name, elapsed_ms = elapsed, "reader connected");
                self.observer
                    .status_changed(&format!("connected: {name} ({elapsed} ms)"), true);
            }
            Err(err) => {
                error!(error = %err, reader = %name, "connect failed");
                let _ = self.transition(SessionState::Idle);
                self.observer.status_changed(&err.status_description(), false);
            }
        }
    }

    async fn finish_connect(&mut self, reader: &mut AnyReader) -> Result<()> {
        let listener = self
            .listener
            .clone()
            .ok_or_else(|| Error::usage("no event dispatcher attached"))?;
        reader.register_event_listener(listener)?;
        reader
            .subscribe_events(EventSubscriptions {
                handheld_trigger: true,
                tag_read: true,
                attach_tag_data: false,
                reader_disconnect: true,
            })
            .await?;
        Ok(())
    }

    /// Run the teardown sequence if currently connected.
    pub(crate) async fn do_disconnect(&mut self) {
        if self.state != SessionState::Connected {
            debug!(state = %self.state, "disconnect requested while not connected");
            return;
        }
        if let Err(err) = self.transition(SessionState::Disconnecting) {
            error!(error = %err, "disconnect rejected");
            return;
        }
        self.release_active().await;
        let _ = self.transition(SessionState::Idle);
        self.observer.status_changed("disconnected", false);
    }

    /// Unregister the listener, terminate a correlated scanner session,
    /// and release the handle. Best-effort: failures are logged and the
    /// sequence continues.
    async fn release_active(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        active.reader.unregister_event_listener();
        if let Some(id) = self.scanner_session.take() {
            if let Err(err) = self.scanner.terminate_session(id).await {
                warn!(error = %err, scanner = id, "scanner session termination failed");
            }
        }
        if let Err(err) = active.reader.disconnect().await {
            warn!(error = %err, reader = %active.host_name, "reader disconnect failed");
        }
        if let Err(err) = active.reader.dispose().await {
            warn!(error = %err, reader = %active.host_name, "reader handle dispose failed");
        }
        info!(reader = %active.host_name, "reader released");
    }

    /// Disconnect if needed, release the discovery resource, and enter the
    /// terminal state. Idempotent.
    pub(crate) async fn do_dispose(&mut self) {
        if self.state == SessionState::Disposed {
            debug!("dispose on an already disposed session");
            return;
        }
        if self.state == SessionState::Connected {
            let _ = self.transition(SessionState::Disconnecting);
            self.release_active().await;
            let _ = self.transition(SessionState::Idle);
            self.observer.status_changed("disconnected", false);
        }
        self.discovery.detach();
        if let Err(err) = self.discovery.dispose().await {
            warn!(error = %err, "discovery channel dispose failed");
        }
        let _ = self.transition(SessionState::Disposed);
        info!("session disposed");
    }

    /// Disconnect when connected, connect otherwise.
    pub(crate) async fn do_toggle(&mut self) {
        if self.state == SessionState::Connected {
            self.do_disconnect().await;
        } else {
            self.do_connect().await;
        }
    }

    /// A reader became visible. Auto-connect only from `Idle`; a failure
    /// is reported like any other and the next appearance is the retry.
    pub(crate) async fn handle_appearance(&mut self, name: &str) {
        debug!(reader = name, "reader appeared");
        if self.state == SessionState::Idle {
            self.do_connect().await;
        }
    }

    /// A reader vanished. Always surfaced; disconnects only when it names
    /// the currently connected device.
    pub(crate) async fn handle_disappearance(&mut self, name: &str) {
        self.observer.notice(&format!("reader disappeared: {name}"));
        let is_current = self
            .active
            .as_ref()
            .is_some_and(|active| active.host_name == name);
        if self.state == SessionState::Connected && is_current {
            self.do_disconnect().await;
        }
    }

    /// The reader dropped the connection from its side.
    pub(crate) async fn handle_remote_disconnect(&mut self) {
        info!("reader reported disconnection");
        self.do_disconnect().await;
    }

    /// Fetch a bounded batch of newly read tags and forward it.
    ///
    /// Fetch errors are logged and the batch dropped; they never escape to
    /// the driver's callback thread.
    pub(crate) async fn fetch_tag_batch(&mut self) {
        let max = self.config.max_tags_per_poll;
        let Some(active) = self.active.as_mut() else {
            debug!("tag read notification without an active reader");
            return;
        };
        match active.reader.read_tags(max).await {
            Ok(batch) if batch.is_empty() => {}
            Ok(batch) => self.observer.tag_batch(&batch),
            Err(err) => warn!(error = %err, "tag batch fetch failed, dropping batch"),
        }
    }

    pub(crate) fn forward_trigger(&self, pressed: bool) {
        self.observer.trigger_changed(pressed);
    }

    /// Apply the default antenna and singulation configuration.
    pub(crate) async fn do_apply_defaults(&mut self) {
        if self.state != SessionState::Connected {
            self.observer.notice("not connected");
            return;
        }
        let power = self.config.default_transmit_power;
        if let Err(err) = self.configure_defaults(power).await {
            error!(error = %err, "default configuration failed");
            self.observer.notice(&err.status_description());
        } else {
            info!(power, "default configuration applied");
        }
    }

    async fn configure_defaults(&mut self, power: u16) -> Result<()> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| Error::usage("no active reader"))?;

        let mut rf = active.reader.antenna_rf_config(DEFAULT_ANTENNA).await?;
        rf.transmit_power_index = power;
        rf.rf_mode_table_index = DEFAULT_RF_MODE_TABLE_INDEX;
        rf.tari = DEFAULT_TARI;
        active.reader.set_antenna_rf_config(DEFAULT_ANTENNA, rf).await?;

        let mut control = active.reader.singulation_control(DEFAULT_ANTENNA).await?;
        control.session = SingulationSession::S0;
        control.inventory_state = InventoryState::StateA;
        control.sl_flag = SlFlag::All;
        active
            .reader
            .set_singulation_control(DEFAULT_ANTENNA, control)
            .await?;
        Ok(())
    }

    pub(crate) async fn do_start_inventory(&mut self) {
        if self.state != SessionState::Connected {
            self.observer.notice("not connected");
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if let Err(err) = active.reader.inventory_perform().await {
            error!(error = %err, "inventory start failed");
            self.observer.notice(&err.status_description());
        }
    }

    pub(crate) async fn do_stop_inventory(&mut self) {
        if self.state != SessionState::Connected {
            self.observer.notice("not connected");
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if let Err(err) = active.reader.inventory_stop().await {
            error!(error = %err, "inventory stop failed");
            self.observer.notice(&err.status_description());
        }
    }

    /// Establish a scanner session for the scanner correlated to the
    /// connected reader by advertised name.
    pub(crate) async fn do_setup_scanner(&mut self) {
        if self.state != SessionState::Connected {
            self.observer.notice("not connected");
            return;
        }
        let Some(host) = self
            .active
            .as_ref()
            .map(|active| active.host_name.clone())
        else {
            return;
        };
        let scanners = match self.scanner.available_scanners().await {
            Ok(scanners) => scanners,
            Err(err) => {
                error!(error = %err, "scanner enumeration failed");
                self.observer.notice(&err.status_description());
                return;
            }
        };
        let Some(info) = scanners.into_iter().find(|s| s.name.contains(&host)) else {
            debug!(reader = %host, "no scanner correlated to the connected reader");
            self.observer.notice("no matching scanner found");
            return;
        };
        match self.scanner.establish_session(info.id).await {
            Ok(()) => {
                self.scanner_session = Some(info.id);
                info!(scanner = info.id, name = %info.name, "scanner session established");
            }
            Err(err) => {
                error!(error = %err, scanner = info.id, "scanner session establishment failed");
                self.observer.notice(&err.status_description());
            }
        }
    }

    /// Issue the pull-trigger opcode to the established scanner session.
    pub(crate) async fn do_scan_code(&mut self) {
        let Some(id) = self.scanner_session else {
            self.observer.notice("no scanner session");
            return;
        };
        let xml = format!("<inArgs><scannerID>{id}</scannerID></inArgs>");
        if let Err(err) = self
            .scanner
            .execute_opcode(ScannerOpcode::PullTrigger, &xml, id)
            .await
        {
            error!(error = %err, scanner = id, "scan command failed");
            self.observer.notice(&err.status_description());
        }
    }
}

/// The public session handle.
///
/// Explicitly constructed and explicitly owned; there is no process-wide
/// instance. Every operation submits to the command worker and returns
/// immediately — results and side effects reach the owner through the
/// [`SessionObserver`] it supplied.
///
/// Dropping the handle without calling
/// [`shutdown`](ReaderSession::shutdown) lets already-queued operations
/// drain, then stops the worker; the device handle is not disconnected in
/// that case.
pub struct ReaderSession {
    serializer: CommandSerializer<ConnectionManager>,
    connected: Arc<AtomicBool>,
}

impl ReaderSession {
    /// Create a session over the given driver stack and observer.
    ///
    /// Spawns the command worker; must be called from within a tokio
    /// runtime.
    pub fn new(
        config: SessionConfig,
        discovery: AnyDiscovery,
        scanner: AnyScannerGateway,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        let connected = Arc::new(AtomicBool::new(false));
        let manager = ConnectionManager::new(
            config,
            discovery,
            scanner,
            observer,
            Arc::clone(&connected),
        );
        let serializer = CommandSerializer::spawn(manager);
        let dispatcher = Arc::new(EventDispatcher::new(serializer.submitter()));
        serializer.submit(move |manager| {
            Box::pin(async move { manager.attach_dispatcher(dispatcher) })
        });
        Self {
            serializer,
            connected,
        }
    }

    /// Discover, select, and connect to a reader.
    pub fn connect(&self) {
        self.serializer
            .submit(|manager| Box::pin(async move { manager.do_connect().await }));
    }

    /// Disconnect the current reader, if any.
    pub fn disconnect(&self) {
        self.serializer
            .submit(|manager| Box::pin(async move { manager.do_disconnect().await }));
    }

    /// Disconnect if connected, connect otherwise.
    pub fn toggle(&self) {
        self.serializer
            .submit(|manager| Box::pin(async move { manager.do_toggle().await }));
    }

    /// Apply the default antenna and singulation configuration.
    pub fn apply_defaults(&self) {
        self.serializer
            .submit(|manager| Box::pin(async move { manager.do_apply_defaults().await }));
    }

    /// Start a continuous inventory operation.
    pub fn start_inventory(&self) {
        self.serializer
            .submit(|manager| Box::pin(async move { manager.do_start_inventory().await }));
    }

    /// Stop a running inventory operation.
    pub fn stop_inventory(&self) {
        self.serializer
            .submit(|manager| Box::pin(async move { manager.do_stop_inventory().await }));
    }

    /// Correlate and establish the auxiliary scanner session.
    pub fn setup_scanner(&self) {
        self.serializer
            .submit(|manager| Box::pin(async move { manager.do_setup_scanner().await }));
    }

    /// Trigger a barcode scan on the established scanner session.
    pub fn scan_code(&self) {
        self.serializer
            .submit(|manager| Box::pin(async move { manager.do_scan_code().await }));
    }

    /// Release everything and enter the terminal state. Idempotent.
    pub fn dispose(&self) {
        self.serializer
            .submit(|manager| Box::pin(async move { manager.do_dispose().await }));
    }

    /// Best-effort, stale-tolerant connectivity read.
    ///
    /// Suitable for quick UI decisions; only the worker's own view is
    /// authoritative for mutating decisions.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Wait until every previously submitted operation has executed.
    pub async fn flush(&self) {
        self.serializer.flush().await;
    }

    /// Dispose the session, then drain and stop the worker.
    pub async fn shutdown(self) {
        self.dispose();
        self.serializer.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use rfdlink_core::TagRead;
    use rfdlink_driver::mock::{MockDiscovery, MockScanner};

    use super::*;

    struct NopObserver;

    impl SessionObserver for NopObserver {
        fn status_changed(&self, _text: &str, _connected: bool) {}
        fn tag_batch(&self, _reads: &[TagRead]) {}
        fn trigger_changed(&self, _pressed: bool) {}
        fn notice(&self, _message: &str) {}
    }

    fn session() -> (ReaderSession, rfdlink_driver::mock::MockDiscoveryHandle) {
        let (discovery, discovery_handle) = MockDiscovery::new();
        let (scanner, _) = MockScanner::new();
        let session = ReaderSession::new(
            SessionConfig::default(),
            AnyDiscovery::Mock(discovery),
            AnyScannerGateway::Mock(scanner),
            Arc::new(NopObserver),
        );
        (session, discovery_handle)
    }

    #[tokio::test]
    async fn test_new_session_starts_disconnected() {
        let (session, _discovery) = session();
        assert!(!session.is_connected());
        session.flush().await;
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_dispatcher_attached_before_first_operation() {
        let (session, discovery) = session();
        session.flush().await;
        assert!(discovery.has_observer());
    }

    #[tokio::test]
    async fn test_shutdown_releases_discovery() {
        let (session, discovery) = session();
        session.shutdown().await;
        assert!(discovery.is_disposed());
        assert!(!discovery.has_observer());
    }
}
