//! The UI-facing observer contract.

use rfdlink_core::TagRead;

/// Callback set through which the session reports to its owner.
///
/// The session core invokes these from its worker (and, for the periodic
/// connecting notification, from a timer task), never blocks on them, and
/// is never re-entered synchronously from inside a notification — an
/// implementation that wants to issue a session operation in response must
/// do so from another context, not from the callback itself.
///
/// Implementations are expected to marshal onto whatever presentation
/// thread they need and to return quickly.
pub trait SessionObserver: Send + Sync {
    /// Connection status text changed, e.g. `connecting... 2 s` or
    /// `connected: RFD4031-G10B700-WR-001 (1200 ms)`.
    fn status_changed(&self, text: &str, connected: bool);

    /// A batch of newly read tags, in device read order.
    fn tag_batch(&self, reads: &[TagRead]);

    /// The reader's physical trigger was pressed (`true`) or released.
    fn trigger_changed(&self, pressed: bool);

    /// A one-off message: discovery outcomes, failure descriptions,
    /// disappearance notifications.
    fn notice(&self, message: &str);
}
