//! Shared helpers for session integration tests.
//!
//! `rig()` wires a [`ReaderSession`] to a full mock driver stack and a
//! recording observer, with one reader placed on the USB transport under
//! the default name prefix.

// Helpers are shared across test binaries; not every binary uses every one.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rfdlink_core::{SessionConfig, TagRead, TransportKind};
use rfdlink_driver::mock::{
    MockDiscovery, MockDiscoveryHandle, MockReader, MockReaderHandle, MockScanner,
    MockScannerHandle,
};
use rfdlink_driver::{AnyDiscovery, AnyScannerGateway};
use rfdlink_session::{ReaderSession, SessionObserver};

pub const READER_NAME: &str = "RFD4031-G10B700-WR-001";

/// One observer notification, recorded for assertion.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverCall {
    Status { text: String, connected: bool },
    Tags(Vec<String>),
    Trigger(bool),
    Notice(String),
}

/// Observer that records every notification it receives.
#[derive(Default)]
pub struct RecordingObserver {
    calls: Mutex<Vec<ObserverCall>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, call: ObserverCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ObserverCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn statuses(&self) -> Vec<(String, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ObserverCall::Status { text, connected } => Some((text, connected)),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ObserverCall::Notice(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn triggers(&self) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ObserverCall::Trigger(pressed) => Some(pressed),
                _ => None,
            })
            .collect()
    }

    pub fn tag_batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ObserverCall::Tags(epcs) => Some(epcs),
                _ => None,
            })
            .collect()
    }
}

impl SessionObserver for RecordingObserver {
    fn status_changed(&self, text: &str, connected: bool) {
        self.push(ObserverCall::Status {
            text: text.to_owned(),
            connected,
        });
    }

    fn tag_batch(&self, reads: &[TagRead]) {
        self.push(ObserverCall::Tags(
            reads.iter().map(|read| read.epc.clone()).collect(),
        ));
    }

    fn trigger_changed(&self, pressed: bool) {
        self.push(ObserverCall::Trigger(pressed));
    }

    fn notice(&self, message: &str) {
        self.push(ObserverCall::Notice(message.to_owned()));
    }
}

/// A session wired to a full mock driver rig.
pub struct Rig {
    pub session: ReaderSession,
    pub observer: Arc<RecordingObserver>,
    pub reader: MockReaderHandle,
    pub discovery: MockDiscoveryHandle,
    pub scanner: MockScannerHandle,
}

pub fn rig() -> Rig {
    rig_with_config(SessionConfig::default())
}

pub fn rig_with_config(config: SessionConfig) -> Rig {
    let (_, reader_handle) = MockReader::new(READER_NAME);
    let (discovery, discovery_handle) = MockDiscovery::new();
    discovery_handle.place_reader(TransportKind::Usb, &reader_handle);
    let (scanner, scanner_handle) = MockScanner::new();
    let observer = RecordingObserver::new();
    let session = ReaderSession::new(
        config,
        AnyDiscovery::Mock(discovery),
        AnyScannerGateway::Mock(scanner),
        observer.clone(),
    );
    Rig {
        session,
        observer,
        reader: reader_handle,
        discovery: discovery_handle,
        scanner: scanner_handle,
    }
}

/// Connect the rig's reader and clear the notifications that produced.
pub async fn connect(rig: &Rig) {
    rig.session.connect();
    rig.session.flush().await;
    assert!(rig.session.is_connected(), "rig failed to connect");
    rig.observer.clear();
}
