//! rfdlink demonstration binary.
//!
//! Wires a [`ReaderSession`] to the mock driver stack and a console
//! observer, then walks the session through a connect, some simulated
//! hardware traffic, and a disappearance, printing every notification the
//! observer receives.
//!
//! ```text
//! RUST_LOG=debug cargo run -p rfdlink-cli
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rfdlink_core::{SessionConfig, TagRead, TransportKind};
use rfdlink_driver::mock::{MockDiscovery, MockReader, MockScanner};
use rfdlink_driver::{AnyDiscovery, AnyScannerGateway};
use rfdlink_session::{ReaderSession, SessionObserver};

/// Observer that renders every notification to stdout.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn status_changed(&self, text: &str, connected: bool) {
        println!("[status]  {text} (connected: {connected})");
    }

    fn tag_batch(&self, reads: &[TagRead]) {
        for read in reads {
            println!("[tag]     {read}");
        }
    }

    fn trigger_changed(&self, pressed: bool) {
        println!(
            "[trigger] {}",
            if pressed { "pressed" } else { "released" }
        );
    }

    fn notice(&self, message: &str) {
        println!("[notice]  {message}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Mock hardware: one reader docked on USB, one correlated scanner.
    let (_, reader) = MockReader::new("RFD4031-G10B700-WR-001");
    reader.set_connect_delay(Duration::from_millis(250));

    let (discovery, discovery_handle) = MockDiscovery::new();
    discovery_handle.place_reader(TransportKind::Usb, &reader);

    let (scanner, scanner_handle) = MockScanner::new();
    scanner_handle.add_scanner(1, "RFD4031-G10B700-WR-001-SCANNER");

    let session = ReaderSession::new(
        SessionConfig::default(),
        AnyDiscovery::Mock(discovery),
        AnyScannerGateway::Mock(scanner),
        Arc::new(ConsoleObserver),
    );

    info!("connecting to the mock reader");
    session.connect();
    session.apply_defaults();
    session.setup_scanner();
    session.flush().await;

    // Simulated hardware traffic.
    reader.press_trigger();
    session.start_inventory();
    reader.queue_tags([
        TagRead::new("E28011700000020F1CC5D445", -48),
        TagRead::new("E28011700000020F1CC5D9A1", -61),
    ]);
    reader.notify_read();
    session.stop_inventory();
    reader.release_trigger();
    session.scan_code();
    session.flush().await;

    // The operator walks away with the reader.
    discovery_handle.announce_disappearance(reader.name());
    session.flush().await;

    session.shutdown().await;
    info!("session shut down");
    Ok(())
}
