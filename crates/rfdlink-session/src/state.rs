//! Connection lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of the managed reader connection.
///
/// The lifecycle is `Idle → Connecting → Connected → Disconnecting → Idle`,
/// with `Disposed` reachable from every state and terminal. `Connecting`
/// and `Disconnecting` only exist within a single worker operation; between
/// operations the session rests in `Idle`, `Connected`, or `Disposed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No device handle held.
    Idle,

    /// A connect attempt is in flight.
    Connecting,

    /// A reader is connected and its listener registered.
    Connected,

    /// The teardown sequence is running.
    Disconnecting,

    /// Terminal. The session accepts no further operations.
    Disposed,
}

impl SessionState {
    /// Check whether a transition to `target` is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use rfdlink_session::SessionState;
    ///
    /// assert!(SessionState::Idle.can_transition_to(&SessionState::Connecting));
    /// assert!(!SessionState::Idle.can_transition_to(&SessionState::Disconnecting));
    /// assert!(!SessionState::Disposed.can_transition_to(&SessionState::Idle));
    /// ```
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        if matches!(self, SessionState::Disposed) {
            return false;
        }
        matches!(
            (self, target),
            // From Idle
            (SessionState::Idle, SessionState::Connecting)
            // From Connecting: success or rollback on failure
            | (SessionState::Connecting, SessionState::Connected | SessionState::Idle)
            // From Connected
            | (SessionState::Connected, SessionState::Disconnecting)
            // From Disconnecting
            | (SessionState::Disconnecting, SessionState::Idle)
            // Disposal is reachable from every non-terminal state
            | (_, SessionState::Disposed)
        )
    }

    /// Whether this state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Disposed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "Idle",
            SessionState::Connecting => "Connecting",
            SessionState::Connected => "Connected",
            SessionState::Disconnecting => "Disconnecting",
            SessionState::Disposed => "Disposed",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions_are_valid() {
        assert!(SessionState::Idle.can_transition_to(&SessionState::Connecting));
        assert!(SessionState::Connecting.can_transition_to(&SessionState::Connected));
        assert!(SessionState::Connecting.can_transition_to(&SessionState::Idle));
        assert!(SessionState::Connected.can_transition_to(&SessionState::Disconnecting));
        assert!(SessionState::Disconnecting.can_transition_to(&SessionState::Idle));
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        assert!(!SessionState::Idle.can_transition_to(&SessionState::Connected));
        assert!(!SessionState::Idle.can_transition_to(&SessionState::Disconnecting));
        assert!(!SessionState::Connected.can_transition_to(&SessionState::Connecting));
        assert!(!SessionState::Connected.can_transition_to(&SessionState::Idle));
    }

    #[test]
    fn test_dispose_reachable_from_every_state_and_terminal() {
        for state in [
            SessionState::Idle,
            SessionState::Connecting,
            SessionState::Connected,
            SessionState::Disconnecting,
        ] {
            assert!(state.can_transition_to(&SessionState::Disposed));
            assert!(!state.is_terminal());
        }
        assert!(SessionState::Disposed.is_terminal());
        assert!(!SessionState::Disposed.can_transition_to(&SessionState::Disposed));
        assert!(!SessionState::Disposed.can_transition_to(&SessionState::Idle));
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::Idle.to_string(), "Idle");
        assert_eq!(SessionState::Connecting.to_string(), "Connecting");
        assert_eq!(SessionState::Disposed.to_string(), "Disposed");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&SessionState::Connecting).unwrap();
        assert_eq!(json, "\"connecting\"");
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SessionState::Connecting);
    }
}
