//! Re-posts driver callbacks onto the command worker.
//!
//! The vendor driver invokes its callbacks on a thread it owns. The
//! [`EventDispatcher`] is the session's implementation of both callback
//! capability traits; every method only enqueues an operation on the
//! [`CommandSubmitter`](crate::CommandSubmitter) and returns, so the
//! driver's thread is never blocked and never touches session state.
//!
//! Within one event category, submission order matches the driver's
//! callback order, so the observer sees trigger transitions and tag batches
//! each in a consistent sequence. Across categories no ordering is
//! promised.

use rfdlink_driver::events::{AppearanceObserver, ReaderEventListener, StatusEvent};
use tracing::debug;

use crate::manager::ConnectionManager;
use crate::serializer::CommandSubmitter;

/// Listener registered with the reader and the discovery channel.
pub struct EventDispatcher {
    submitter: CommandSubmitter<ConnectionManager>,
}

impl EventDispatcher {
    pub(crate) fn new(submitter: CommandSubmitter<ConnectionManager>) -> Self {
        Self { submitter }
    }
}

impl ReaderEventListener for EventDispatcher {
    fn read_notify(&self) {
        self.submitter
            .submit(|manager| Box::pin(async move { manager.fetch_tag_batch().await }));
    }

    fn status_notify(&self, event: StatusEvent) {
        match event {
            StatusEvent::HandheldTrigger(trigger) => {
                let pressed = trigger.is_pressed();
                self.submitter.submit(move |manager| {
                    Box::pin(async move { manager.forward_trigger(pressed) })
                });
            }
            StatusEvent::Disconnection => {
                self.submitter
                    .submit(|manager| Box::pin(async move { manager.handle_remote_disconnect().await }));
            }
            // Unrecognized sub-types are logged and dropped, never
            // propagated as errors.
            other => {
                debug!(event = %other, "dropping unhandled status event");
            }
        }
    }
}

impl AppearanceObserver for EventDispatcher {
    fn reader_appeared(&self, name: &str) {
        let name = name.to_owned();
        self.submitter
            .submit(move |manager| Box::pin(async move { manager.handle_appearance(&name).await }));
    }

    fn reader_disappeared(&self, name: &str) {
        let name = name.to_owned();
        self.submitter.submit(move |manager| {
            Box::pin(async move { manager.handle_disappearance(&name).await })
        });
    }
}
