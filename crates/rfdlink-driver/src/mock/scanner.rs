//! Mock barcode-scanner gateway.
//!
//! Simulates the auxiliary scanner SDK's session surface: a list of visible
//! scanners, session establishment and termination, and opcode execution.
//! The paired [`MockScannerHandle`] records what the session layer did so
//! tests can assert correlation and teardown behavior.

use std::sync::{Arc, Mutex};

use rfdlink_core::{Error, Result};

use crate::traits::ScannerGateway;
use crate::types::{ScannerInfo, ScannerOpcode};

#[derive(Default)]
struct ScannerState {
    scanners: Vec<ScannerInfo>,
    sessions: Vec<u32>,
    terminated: Vec<u32>,
    executed: Vec<(ScannerOpcode, String, u32)>,
    fail_next_list: Option<String>,
}

/// Mock scanner gateway for testing and development.
///
/// ```
/// use rfdlink_driver::mock::MockScanner;
/// use rfdlink_driver::traits::ScannerGateway;
///
/// #[tokio::main]
/// async fn main() -> rfdlink_driver::Result<()> {
///     let (mut gateway, handle) = MockScanner::new();
///     handle.add_scanner(7, "RFD4031-G10B700-WR-001-SCANNER");
///
///     let scanners = gateway.available_scanners().await?;
///     gateway.establish_session(scanners[0].id).await?;
///     assert!(handle.has_session(7));
///     Ok(())
/// }
/// ```
pub struct MockScanner {
    state: Arc<Mutex<ScannerState>>,
}

impl MockScanner {
    /// Create a new mock gateway with no visible scanners.
    pub fn new() -> (Self, MockScannerHandle) {
        let state = Arc::new(Mutex::new(ScannerState::default()));
        let gateway = Self {
            state: Arc::clone(&state),
        };
        let handle = MockScannerHandle { state };
        (gateway, handle)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScannerState> {
        self.state.lock().expect("mock scanner state poisoned")
    }
}

impl std::fmt::Debug for MockScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockScanner").finish_non_exhaustive()
    }
}

impl ScannerGateway for MockScanner {
    async fn available_scanners(&mut self) -> Result<Vec<ScannerInfo>> {
        let mut state = self.lock();
        if let Some(message) = state.fail_next_list.take() {
            return Err(Error::operation_failure(message));
        }
        Ok(state.scanners.clone())
    }

    async fn establish_session(&mut self, scanner_id: u32) -> Result<()> {
        let mut state = self.lock();
        if !state.scanners.iter().any(|s| s.id == scanner_id) {
            return Err(Error::usage(format!("unknown scanner id {scanner_id}")));
        }
        if !state.sessions.contains(&scanner_id) {
            state.sessions.push(scanner_id);
        }
        Ok(())
    }

    async fn terminate_session(&mut self, scanner_id: u32) -> Result<()> {
        let mut state = self.lock();
        state.sessions.retain(|id| *id != scanner_id);
        state.terminated.push(scanner_id);
        Ok(())
    }

    async fn execute_opcode(
        &mut self,
        opcode: ScannerOpcode,
        xml_args: &str,
        scanner_id: u32,
    ) -> Result<()> {
        let mut state = self.lock();
        if !state.sessions.contains(&scanner_id) {
            return Err(Error::usage(format!(
                "no session established for scanner {scanner_id}"
            )));
        }
        state
            .executed
            .push((opcode, xml_args.to_owned(), scanner_id));
        Ok(())
    }
}

/// Handle for controlling a [`MockScanner`] from test code.
#[derive(Clone)]
pub struct MockScannerHandle {
    state: Arc<Mutex<ScannerState>>,
}

impl MockScannerHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, ScannerState> {
        self.state.lock().expect("mock scanner state poisoned")
    }

    /// Make a scanner visible to the gateway.
    pub fn add_scanner(&self, id: u32, name: impl Into<String>) {
        self.lock().scanners.push(ScannerInfo::new(id, name));
    }

    /// Make the next scanner enumeration fail.
    pub fn fail_next_list(&self, message: impl Into<String>) {
        self.lock().fail_next_list = Some(message.into());
    }

    /// Whether a session is currently established for the scanner.
    pub fn has_session(&self, id: u32) -> bool {
        self.lock().sessions.contains(&id)
    }

    /// Session ids terminated so far, in termination order.
    pub fn terminated(&self) -> Vec<u32> {
        self.lock().terminated.clone()
    }

    /// Opcodes executed so far, each with its XML arguments and session id.
    pub fn executed(&self) -> Vec<(ScannerOpcode, String, u32)> {
        self.lock().executed.clone()
    }
}

impl std::fmt::Debug for MockScannerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockScannerHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_establish_requires_known_scanner() {
        let (mut gateway, handle) = MockScanner::new();
        let err = gateway.establish_session(3).await.unwrap_err();
        assert!(matches!(err, Error::Usage { .. }));

        handle.add_scanner(3, "SCANNER-3");
        gateway.establish_session(3).await.unwrap();
        assert!(handle.has_session(3));
    }

    #[tokio::test]
    async fn test_terminate_unknown_session_is_not_an_error() {
        let (mut gateway, handle) = MockScanner::new();
        gateway.terminate_session(42).await.unwrap();
        assert_eq!(handle.terminated(), vec![42]);
    }

    #[tokio::test]
    async fn test_execute_opcode_requires_session() {
        let (mut gateway, handle) = MockScanner::new();
        handle.add_scanner(7, "SCANNER-7");

        let err = gateway
            .execute_opcode(ScannerOpcode::PullTrigger, "<inArgs/>", 7)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Usage { .. }));

        gateway.establish_session(7).await.unwrap();
        gateway
            .execute_opcode(ScannerOpcode::PullTrigger, "<inArgs/>", 7)
            .await
            .unwrap();
        let executed = handle.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].0, ScannerOpcode::PullTrigger);
    }
}
