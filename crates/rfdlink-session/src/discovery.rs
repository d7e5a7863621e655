//! Transport fallback discovery and device selection.

use rfdlink_core::{Result, TransportKind};
use rfdlink_driver::devices::DiscoveredDevice;
use rfdlink_driver::traits::DiscoveryChannel;
use tracing::debug;

/// Probes transports in priority order and stops at the first hit.
///
/// One prober serves the whole session: the underlying channel is opened on
/// the first transport ever probed and re-targeted for every probe after
/// that, including probes in later discovery rounds.
#[derive(Debug, Default)]
pub struct TransportProber {
    opened: bool,
}

impl TransportProber {
    pub fn new() -> Self {
        Self { opened: false }
    }

    /// Walk `transports` in order, returning the first non-empty device
    /// list.
    ///
    /// Probing every transport without finding a device yields an empty
    /// list, which is a normal outcome.
    ///
    /// # Errors
    ///
    /// A channel failure on any transport aborts the whole probe and is
    /// surfaced to the caller, distinct from "no devices found."
    pub async fn discover<C: DiscoveryChannel>(
        &mut self,
        channel: &mut C,
        transports: &[TransportKind],
    ) -> Result<Vec<DiscoveredDevice>> {
        for (attempt, &transport) in transports.iter().enumerate() {
            if self.opened {
                channel.retarget(transport).await?;
            } else {
                channel.open(transport).await?;
                self.opened = true;
            }
            debug!(attempt = attempt + 1, %transport, "probing transport");
            let devices = channel.available_readers().await?;
            if !devices.is_empty() {
                debug!(count = devices.len(), %transport, "discovery found readers");
                return Ok(devices);
            }
        }
        debug!("no readers found on any transport");
        Ok(Vec::new())
    }
}

/// Picks one reader out of a discovery result.
#[derive(Debug, Clone)]
pub struct DeviceSelector {
    prefix: String,
}

impl DeviceSelector {
    /// Create a selector with the expected advertised-name prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Select a reader: a single candidate is taken unconditionally;
    /// among several, the first whose name starts with the configured
    /// prefix wins; `None` means the list could not be disambiguated.
    pub fn select(&self, mut devices: Vec<DiscoveredDevice>) -> Option<DiscoveredDevice> {
        match devices.len() {
            0 => None,
            1 => devices.pop(),
            _ => {
                let index = devices
                    .iter()
                    .position(|device| device.name().starts_with(&self.prefix))?;
                Some(devices.swap_remove(index))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rfdlink_driver::devices::AnyReader;
    use rfdlink_driver::mock::{MockDiscovery, MockReader};

    use super::*;

    fn device(name: &str) -> DiscoveredDevice {
        let (reader, _) = MockReader::new(name);
        DiscoveredDevice::new(name, AnyReader::Mock(reader))
    }

    const PRIORITY: [TransportKind; 5] = [
        TransportKind::ServiceUsb,
        TransportKind::Serial,
        TransportKind::Usb,
        TransportKind::Bluetooth,
        TransportKind::All,
    ];

    #[tokio::test]
    async fn test_discovery_stops_at_first_transport_with_devices() {
        let (_, reader) = MockReader::new("RFD4031-G10B700-WR-001");
        let (mut discovery, handle) = MockDiscovery::new();
        handle.place_reader(TransportKind::Usb, &reader);

        let mut prober = TransportProber::new();
        let devices = prober.discover(&mut discovery, &PRIORITY).await.unwrap();

        assert_eq!(devices.len(), 1);
        // Transports 0..=k probed, nothing beyond the first hit at k.
        assert_eq!(
            handle.probe_log(),
            vec![
                TransportKind::ServiceUsb,
                TransportKind::Serial,
                TransportKind::Usb
            ]
        );
    }

    #[tokio::test]
    async fn test_all_transports_empty_yields_empty_list() {
        let (mut discovery, handle) = MockDiscovery::new();
        let mut prober = TransportProber::new();

        let devices = prober.discover(&mut discovery, &PRIORITY).await.unwrap();
        assert!(devices.is_empty());
        assert_eq!(handle.probe_log().len(), PRIORITY.len());
    }

    #[tokio::test]
    async fn test_query_failure_aborts_the_probe() {
        let (mut discovery, handle) = MockDiscovery::new();
        handle.fail_next_query("invalid channel state");

        let mut prober = TransportProber::new();
        let err = prober
            .discover(&mut discovery, &PRIORITY)
            .await
            .unwrap_err();
        assert!(matches!(err, rfdlink_core::Error::Discovery { .. }));
        assert!(handle.probe_log().is_empty());
    }

    #[tokio::test]
    async fn test_second_round_retargets_instead_of_reopening() {
        let (_, reader) = MockReader::new("RFD4031-G10B700-WR-001");
        let (mut discovery, handle) = MockDiscovery::new();

        let mut prober = TransportProber::new();
        prober.discover(&mut discovery, &PRIORITY).await.unwrap();

        handle.place_reader(TransportKind::ServiceUsb, &reader);
        let devices = prober.discover(&mut discovery, &PRIORITY).await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(handle.probe_log().len(), PRIORITY.len() + 1);
    }

    #[test]
    fn test_single_candidate_selected_regardless_of_name() {
        let selector = DeviceSelector::new("RFD4031-G10B700-WR");
        let selected = selector.select(vec![device("UNRELATED-READER")]);
        assert_eq!(selected.unwrap().name(), "UNRELATED-READER");
    }

    #[test]
    fn test_matching_single_candidate_scenario() {
        let selector = DeviceSelector::new("RFD4031-G10B700-WR");
        let selected = selector.select(vec![device("RFD4031-G10B700-WR-001")]);
        assert_eq!(selected.unwrap().name(), "RFD4031-G10B700-WR-001");
    }

    #[test]
    fn test_multiple_candidates_first_prefix_match_wins() {
        let selector = DeviceSelector::new("RFD4031-G10B700-WR");
        let selected = selector.select(vec![
            device("OTHER-READER"),
            device("RFD4031-G10B700-WR-001"),
            device("RFD4031-G10B700-WR-002"),
        ]);
        assert_eq!(selected.unwrap().name(), "RFD4031-G10B700-WR-001");
    }

    #[test]
    fn test_multiple_candidates_none_matching_is_none() {
        let selector = DeviceSelector::new("RFD4031");
        let selected = selector.select(vec![device("ReaderA"), device("ReaderB")]);
        assert!(selected.is_none());
    }

    #[test]
    fn test_empty_list_is_none() {
        let selector = DeviceSelector::new("RFD4031");
        assert!(selector.select(Vec::new()).is_none());
    }
}
