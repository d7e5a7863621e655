//! Core types shared across the driver boundary and the session manager.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discovery channel over which a reader may be found and addressed.
///
/// Ordering is significant: discovery walks transports in a fixed priority
/// sequence and stops at the first transport that yields any device. The
/// default sequence is [`crate::constants::DEFAULT_TRANSPORT_PRIORITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// USB attachment through the vendor's background service.
    ServiceUsb,

    /// RS232 serial attachment.
    Serial,

    /// Direct USB attachment.
    Usb,

    /// Bluetooth attachment.
    Bluetooth,

    /// Wildcard: every transport the driver supports.
    All,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::ServiceUsb => "SERVICE_USB",
            TransportKind::Serial => "SERIAL",
            TransportKind::Usb => "USB",
            TransportKind::Bluetooth => "BLUETOOTH",
            TransportKind::All => "ALL",
        };
        write!(f, "{}", name)
    }
}

/// A single tag observation reported by the reader.
///
/// Carries the tag identifier (EPC, upper-case hex), the peak received
/// signal strength for the read, and the moment the batch was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRead {
    /// Tag EPC as an upper-case hex string.
    pub epc: String,

    /// Peak RSSI for this read, in dBm.
    pub rssi_dbm: i16,

    /// Timestamp when the read was fetched from the device.
    pub read_at: DateTime<Utc>,
}

impl TagRead {
    /// Create a tag read stamped with the current time.
    pub fn new(epc: impl Into<String>, rssi_dbm: i16) -> Self {
        Self {
            epc: epc.into(),
            rssi_dbm,
            read_at: Utc::now(),
        }
    }
}

impl fmt::Display for TagRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} dBm)", self.epc, self.rssi_dbm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_kind_display() {
        assert_eq!(TransportKind::ServiceUsb.to_string(), "SERVICE_USB");
        assert_eq!(TransportKind::Serial.to_string(), "SERIAL");
        assert_eq!(TransportKind::Usb.to_string(), "USB");
        assert_eq!(TransportKind::Bluetooth.to_string(), "BLUETOOTH");
        assert_eq!(TransportKind::All.to_string(), "ALL");
    }

    #[test]
    fn test_transport_kind_serialization() {
        let kind = TransportKind::ServiceUsb;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"service_usb\"");
        let back: TransportKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, back);
    }

    #[test]
    fn test_tag_read_display() {
        let read = TagRead::new("E28011700000020F1CC5D445", -52);
        assert_eq!(read.to_string(), "E28011700000020F1CC5D445 (-52 dBm)");
    }
}
