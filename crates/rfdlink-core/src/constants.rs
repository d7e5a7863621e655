//! Default configuration constants for the reader session.
//!
//! These values mirror the vendor SDK's recommended defaults for the RFD40
//! series of handheld readers. [`crate::SessionConfig::default`] wires them
//! into a ready-to-use configuration; callers needing different behavior
//! override individual fields instead of editing these.

use std::time::Duration;

use crate::types::TransportKind;

// ============================================================================
// Discovery
// ============================================================================

/// Transport probe order for device discovery.
///
/// Discovery walks this list front to back and stops at the first transport
/// that reports any device. The service-backed USB transport is preferred
/// because it is the cheapest to query and covers the cradle-docked case;
/// `All` is the final catch-all pass.
pub const DEFAULT_TRANSPORT_PRIORITY: [TransportKind; 5] = [
    TransportKind::ServiceUsb,
    TransportKind::Serial,
    TransportKind::Usb,
    TransportKind::Bluetooth,
    TransportKind::All,
];

/// Advertised-name prefix used to disambiguate between multiple readers.
///
/// When discovery yields more than one device, the first whose name starts
/// with this prefix is selected. A single-device result is selected
/// unconditionally, without a name check.
pub const DEFAULT_READER_NAME_PREFIX: &str = "RFD4031-G10B700-WR";

// ============================================================================
// Event handling
// ============================================================================

/// Maximum number of tag reads fetched from the device per read-notify.
///
/// Bounds the size of a single observer batch. The driver buffers reads
/// internally, so a burst larger than this simply arrives over several
/// notifications.
pub const MAX_TAGS_PER_POLL: u16 = 100;

/// Interval between "still connecting" notifications.
///
/// While a connect attempt is in flight the observer receives one status
/// update per interval carrying the elapsed seconds counter.
pub const CONNECTING_TICK_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// Reader configuration defaults
// ============================================================================

/// Transmit power index applied by the default-configuration step.
///
/// Index into the reader's power table; 270 corresponds to the RFD40's
/// full-power ceiling.
pub const DEFAULT_TRANSMIT_POWER: u16 = 270;

/// Antenna the default-configuration step targets.
///
/// Handheld readers in this family expose a single antenna port.
pub const DEFAULT_ANTENNA: u16 = 1;

/// RF mode table index applied by the default-configuration step.
pub const DEFAULT_RF_MODE_TABLE_INDEX: u32 = 0;

/// Tari value applied by the default-configuration step.
pub const DEFAULT_TARI: u32 = 0;
