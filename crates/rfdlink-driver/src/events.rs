//! Hardware-originated event types and the capability traits that receive
//! them.
//!
//! The driver invokes these callbacks on a thread it owns. Implementations
//! must return quickly and must never panic across the boundary; the
//! expected pattern is to re-post the event onto the session's command
//! worker and return.

use std::fmt;

/// Physical trigger transition on the handheld reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Pressed,
    Released,
}

impl TriggerEvent {
    /// Whether this transition is a press.
    pub fn is_pressed(&self) -> bool {
        matches!(self, TriggerEvent::Pressed)
    }
}

/// Status event decoded from a driver status callback.
///
/// The driver reports many status sub-types; only the trigger and
/// disconnect events are meaningful to the session. Everything else arrives
/// as [`StatusEvent::Other`] carrying the raw sub-type code, and the
/// dispatcher's policy is to log and drop it — the `Other` arm makes that
/// policy an explicit match arm rather than an implicit fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatusEvent {
    /// The physical trigger was pressed or released.
    HandheldTrigger(TriggerEvent),

    /// The reader dropped the connection from its side.
    Disconnection,

    /// Any other status sub-type, identified by its raw code.
    Other(u32),
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::HandheldTrigger(TriggerEvent::Pressed) => write!(f, "TRIGGER_PRESSED"),
            StatusEvent::HandheldTrigger(TriggerEvent::Released) => write!(f, "TRIGGER_RELEASED"),
            StatusEvent::Disconnection => write!(f, "DISCONNECTION"),
            StatusEvent::Other(code) => write!(f, "STATUS_{}", code),
        }
    }
}

/// Receiver for events originating from a connected reader.
///
/// Registered on the reader after a successful connect and unregistered
/// during disconnect. Both methods are invoked on the driver's callback
/// thread and must not block.
pub trait ReaderEventListener: Send + Sync {
    /// New tag reads are available on the device.
    ///
    /// The listener is expected to fetch them in a bounded batch via
    /// [`crate::ReaderDriver::read_tags`] from its own execution context —
    /// the notification itself carries no tag data.
    fn read_notify(&self);

    /// A status event occurred on the reader.
    fn status_notify(&self, event: StatusEvent);
}

/// Receiver for reader appearance/disappearance notifications from the
/// discovery channel.
///
/// A small capability trait rather than part of the listener above: the
/// connection manager reacts to these while no reader is connected at all.
/// Both methods are invoked on the driver's callback thread and must not
/// block.
pub trait AppearanceObserver: Send + Sync {
    /// A reader became visible on some transport.
    fn reader_appeared(&self, name: &str);

    /// A previously visible reader vanished.
    fn reader_disappeared(&self, name: &str);
}
