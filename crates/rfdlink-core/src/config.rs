//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONNECTING_TICK_INTERVAL, DEFAULT_READER_NAME_PREFIX, DEFAULT_TRANSMIT_POWER,
    DEFAULT_TRANSPORT_PRIORITY, MAX_TAGS_PER_POLL,
};
use crate::types::TransportKind;

/// Configuration for a reader session.
///
/// The defaults reproduce the vendor SDK sample's behavior; see
/// [`crate::constants`] for the rationale behind each value.
///
/// # Examples
///
/// ```
/// use rfdlink_core::SessionConfig;
///
/// let config = SessionConfig {
///     reader_name_prefix: "RFD4031".to_string(),
///     ..SessionConfig::default()
/// };
/// assert_eq!(config.max_tags_per_poll, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Transports probed during discovery, in priority order.
    pub transport_priority: Vec<TransportKind>,

    /// Advertised-name prefix used to pick a reader when discovery
    /// returns more than one device.
    pub reader_name_prefix: String,

    /// Upper bound on tags fetched from the device per read-notify.
    pub max_tags_per_poll: u16,

    /// Transmit power index applied by the default-configuration step.
    pub default_transmit_power: u16,

    /// Interval between "still connecting" observer notifications.
    pub connecting_tick: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            transport_priority: DEFAULT_TRANSPORT_PRIORITY.to_vec(),
            reader_name_prefix: DEFAULT_READER_NAME_PREFIX.to_string(),
            max_tags_per_poll: MAX_TAGS_PER_POLL,
            default_transmit_power: DEFAULT_TRANSMIT_POWER,
            connecting_tick: CONNECTING_TICK_INTERVAL,
        }
    }
}
