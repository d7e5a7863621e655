//! Event dispatch and device operation tests: hardware callbacks flowing
//! through the serializer to the observer, and the command surface that
//! drives inventory, configuration, and the auxiliary scanner.

mod common;

use common::{READER_NAME, connect, rig, rig_with_config};
use rfdlink_core::{SessionConfig, TagRead};
use rfdlink_driver::types::{InventoryState, ScannerOpcode, SingulationSession, SlFlag};

#[tokio::test(start_paused = true)]
async fn trigger_events_are_forwarded_in_callback_order() {
    let rig = rig();
    connect(&rig).await;

    rig.reader.press_trigger();
    rig.reader.release_trigger();
    rig.reader.press_trigger();
    rig.session.flush().await;

    assert_eq!(rig.observer.triggers(), vec![true, false, true]);
}

#[tokio::test(start_paused = true)]
async fn tag_batches_are_fetched_and_forwarded() {
    let rig = rig();
    connect(&rig).await;

    rig.reader.queue_tags([
        TagRead::new("E28011700000020F1CC5D445", -48),
        TagRead::new("E28011700000020F1CC5D9A1", -61),
    ]);
    rig.reader.notify_read();
    rig.session.flush().await;

    assert_eq!(
        rig.observer.tag_batches(),
        vec![vec![
            "E28011700000020F1CC5D445".to_string(),
            "E28011700000020F1CC5D9A1".to_string(),
        ]]
    );
}

#[tokio::test(start_paused = true)]
async fn tag_fetch_is_bounded_by_the_configured_maximum() {
    let rig = rig_with_config(SessionConfig {
        max_tags_per_poll: 2,
        ..SessionConfig::default()
    });
    connect(&rig).await;

    rig.reader
        .queue_tags((0..5).map(|i| TagRead::new(format!("EPC{i:02}"), -50)));
    rig.reader.notify_read();
    rig.reader.notify_read();
    rig.session.flush().await;

    let batches = rig.observer.tag_batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0], vec!["EPC00".to_string(), "EPC01".to_string()]);
    assert_eq!(batches[1], vec!["EPC02".to_string(), "EPC03".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn failed_tag_fetch_drops_the_batch_silently() {
    let rig = rig();
    connect(&rig).await;

    rig.reader.fail_next_tag_fetch();
    rig.reader.notify_read();
    rig.session.flush().await;

    assert!(rig.observer.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn empty_batches_are_not_forwarded() {
    let rig = rig();
    connect(&rig).await;

    rig.reader.notify_read();
    rig.session.flush().await;

    assert!(rig.observer.tag_batches().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unrecognized_status_events_are_dropped() {
    let rig = rig();
    connect(&rig).await;

    rig.reader.emit_status(99);
    rig.session.flush().await;

    assert!(rig.observer.calls().is_empty());
    assert!(rig.session.is_connected());
}

#[tokio::test(start_paused = true)]
async fn remote_disconnect_event_runs_the_teardown() {
    let rig = rig();
    connect(&rig).await;

    rig.reader.emit_disconnect();
    rig.session.flush().await;

    assert!(!rig.session.is_connected());
    assert!(!rig.reader.has_listener());
    assert!(
        rig.observer
            .statuses()
            .contains(&("disconnected".to_string(), false))
    );
}

#[tokio::test(start_paused = true)]
async fn apply_defaults_writes_antenna_and_singulation_configuration() {
    let rig = rig_with_config(SessionConfig {
        default_transmit_power: 100,
        ..SessionConfig::default()
    });
    connect(&rig).await;

    rig.session.apply_defaults();
    rig.session.flush().await;

    let antenna = rig.reader.antenna_config();
    assert_eq!(antenna.transmit_power_index, 100);
    assert_eq!(antenna.rf_mode_table_index, 0);
    assert_eq!(antenna.tari, 0);

    let singulation = rig.reader.singulation();
    assert_eq!(singulation.session, SingulationSession::S0);
    assert_eq!(singulation.inventory_state, InventoryState::StateA);
    assert_eq!(singulation.sl_flag, SlFlag::All);
}

#[tokio::test(start_paused = true)]
async fn apply_defaults_requires_a_connection() {
    let rig = rig();
    rig.session.apply_defaults();
    rig.session.flush().await;

    assert_eq!(rig.observer.notices(), vec!["not connected".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn inventory_start_and_stop_drive_the_reader() {
    let rig = rig();
    connect(&rig).await;

    rig.session.start_inventory();
    rig.session.flush().await;
    assert!(rig.reader.inventory_running());

    rig.session.stop_inventory();
    rig.session.flush().await;
    assert!(!rig.reader.inventory_running());
}

#[tokio::test(start_paused = true)]
async fn scanner_is_correlated_by_reader_host_name() {
    let rig = rig();
    connect(&rig).await;
    rig.scanner.add_scanner(3, "UNRELATED-SCANNER");
    rig.scanner.add_scanner(7, format!("{READER_NAME}-SCANNER"));

    rig.session.setup_scanner();
    rig.session.flush().await;

    assert!(!rig.scanner.has_session(3));
    assert!(rig.scanner.has_session(7));
}

#[tokio::test(start_paused = true)]
async fn scan_code_issues_the_pull_trigger_opcode() {
    let rig = rig();
    connect(&rig).await;
    rig.scanner.add_scanner(7, format!("{READER_NAME}-SCANNER"));
    rig.session.setup_scanner();

    rig.session.scan_code();
    rig.session.flush().await;

    assert_eq!(
        rig.scanner.executed(),
        vec![(
            ScannerOpcode::PullTrigger,
            "<inArgs><scannerID>7</scannerID></inArgs>".to_string(),
            7
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn scan_code_without_a_session_is_a_notice() {
    let rig = rig();
    connect(&rig).await;

    rig.session.scan_code();
    rig.session.flush().await;

    assert_eq!(rig.observer.notices(), vec!["no scanner session".to_string()]);
    assert!(rig.scanner.executed().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unmatched_scanner_list_is_a_notice() {
    let rig = rig();
    connect(&rig).await;
    rig.scanner.add_scanner(3, "UNRELATED-SCANNER");

    rig.session.setup_scanner();
    rig.session.flush().await;

    assert_eq!(
        rig.observer.notices(),
        vec!["no matching scanner found".to_string()]
    );
}
