//! Value types crossing the driver boundary.
//!
//! Antenna and singulation configuration are treated as opaque-but-typed
//! parameter blocks: the session reads the current block from the driver,
//! adjusts fields, and writes it back, never interpreting the values beyond
//! that.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hardware notification subscriptions enabled on a connected reader.
///
/// Mirrors the driver's per-event enable flags. The session enables trigger,
/// tag-read, and disconnect notifications after a successful connect, with
/// per-read tag data attachment left off (tag data is fetched in bounded
/// batches instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventSubscriptions {
    /// Physical trigger press/release events.
    pub handheld_trigger: bool,

    /// Tag read notifications.
    pub tag_read: bool,

    /// Attach full tag data to each read event instead of batch fetching.
    pub attach_tag_data: bool,

    /// Reader disconnect notifications.
    pub reader_disconnect: bool,
}

/// Per-antenna RF configuration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntennaRfConfig {
    /// Index into the reader's transmit power table.
    pub transmit_power_index: u16,

    /// RF mode table index.
    pub rf_mode_table_index: u32,

    /// Tari (reference time interval) selector.
    pub tari: u32,
}

impl Default for AntennaRfConfig {
    fn default() -> Self {
        Self {
            transmit_power_index: rfdlink_core::constants::DEFAULT_TRANSMIT_POWER,
            rf_mode_table_index: rfdlink_core::constants::DEFAULT_RF_MODE_TABLE_INDEX,
            tari: rfdlink_core::constants::DEFAULT_TARI,
        }
    }
}

/// Gen2 singulation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SingulationSession {
    S0,
    S1,
    S2,
    S3,
}

/// Gen2 inventory state targeted during singulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryState {
    StateA,
    StateB,
    AbFlip,
}

/// Gen2 selected-flag filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlFlag {
    All,
    Asserted,
    Deasserted,
}

/// Per-antenna singulation control block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingulationControl {
    pub session: SingulationSession,
    pub inventory_state: InventoryState,
    pub sl_flag: SlFlag,
}

impl Default for SingulationControl {
    fn default() -> Self {
        Self {
            session: SingulationSession::S0,
            inventory_state: InventoryState::StateA,
            sl_flag: SlFlag::All,
        }
    }
}

/// A barcode scanner visible to the auxiliary scanner gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerInfo {
    /// Gateway-assigned scanner identifier.
    pub id: u32,

    /// Advertised scanner name. Correlated to the RFID reader by checking
    /// whether it contains the reader's host name.
    pub name: String,
}

impl ScannerInfo {
    /// Create a new scanner descriptor.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Command opcodes understood by the scanner gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ScannerOpcode {
    /// Start a scan as if the scanner's trigger were pulled.
    PullTrigger,

    /// Release a previously pulled trigger.
    ReleaseTrigger,
}

impl fmt::Display for ScannerOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScannerOpcode::PullTrigger => "PULL_TRIGGER",
            ScannerOpcode::ReleaseTrigger => "RELEASE_TRIGGER",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_subscriptions_default_all_off() {
        let subs = EventSubscriptions::default();
        assert!(!subs.handheld_trigger);
        assert!(!subs.tag_read);
        assert!(!subs.attach_tag_data);
        assert!(!subs.reader_disconnect);
    }

    #[test]
    fn test_antenna_rf_config_default() {
        let config = AntennaRfConfig::default();
        assert_eq!(config.transmit_power_index, 270);
        assert_eq!(config.rf_mode_table_index, 0);
        assert_eq!(config.tari, 0);
    }

    #[test]
    fn test_singulation_default() {
        let control = SingulationControl::default();
        assert_eq!(control.session, SingulationSession::S0);
        assert_eq!(control.inventory_state, InventoryState::StateA);
        assert_eq!(control.sl_flag, SlFlag::All);
    }

    #[test]
    fn test_scanner_opcode_display() {
        assert_eq!(ScannerOpcode::PullTrigger.to_string(), "PULL_TRIGGER");
        assert_eq!(ScannerOpcode::ReleaseTrigger.to_string(), "RELEASE_TRIGGER");
    }

    #[test]
    fn test_scanner_info_serialization() {
        let info = ScannerInfo::new(7, "RFD4031-G10B700-WR-001-SCANNER");
        let json = serde_json::to_string(&info).unwrap();
        let back: ScannerInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
