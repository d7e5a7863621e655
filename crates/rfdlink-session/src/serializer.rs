//! Single-worker command queue.
//!
//! Every state-mutating session operation passes through a
//! [`CommandSerializer`]: a dedicated worker task that owns the state
//! outright and executes submitted operations strictly in submission order.
//! Callers never block — submission is a synchronous send on an unbounded
//! channel — and because at most one operation runs at a time, the state
//! needs no locking at all.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::trace;

/// Future returned by a pending command, borrowing the worker-owned state.
pub type BoxedFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// A unit of work awaiting its turn on the worker.
pub type PendingCommand<S> = Box<dyn for<'a> FnOnce(&'a mut S) -> BoxedFuture<'a> + Send>;

enum Command<S> {
    Run(PendingCommand<S>),
    Shutdown,
}

/// Single-worker FIFO execution queue owning state `S`.
///
/// Spawned once per session; the worker task takes ownership of `S` and
/// runs each submitted operation to completion before starting the next.
/// On shutdown, operations already queued still drain before the worker
/// stops; submissions after shutdown are silently dropped.
///
/// ```
/// use rfdlink_session::CommandSerializer;
///
/// #[tokio::main]
/// async fn main() {
///     let serializer = CommandSerializer::spawn(Vec::<u32>::new());
///     serializer.submit(|log| Box::pin(async move { log.push(1) }));
///     serializer.submit(|log| Box::pin(async move { log.push(2) }));
///     let log = serializer.shutdown().await.unwrap();
///     assert_eq!(log, vec![1, 2]);
/// }
/// ```
pub struct CommandSerializer<S> {
    tx: mpsc::UnboundedSender<Command<S>>,
    closed: Arc<AtomicBool>,
    worker: JoinHandle<S>,
}

impl<S: Send + 'static> CommandSerializer<S> {
    /// Spawn the worker task, handing it ownership of `state`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(mut state: S) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Run(operation) => operation(&mut state).await,
                    Command::Shutdown => break,
                }
            }
            trace!("command worker stopped");
            state
        });
        Self {
            tx,
            closed: Arc::new(AtomicBool::new(false)),
            worker,
        }
    }

    /// Enqueue an operation for execution on the worker.
    ///
    /// Never blocks. Operations execute strictly in submission order; after
    /// [`shutdown`](CommandSerializer::shutdown) this is a no-op.
    pub fn submit<F>(&self, operation: F)
    where
        F: for<'a> FnOnce(&'a mut S) -> BoxedFuture<'a> + Send + 'static,
    {
        if self.closed.load(Ordering::SeqCst) {
            trace!("dropping submission after shutdown");
            return;
        }
        let _ = self.tx.send(Command::Run(Box::new(operation)));
    }

    /// A cloneable submission endpoint for callback contexts.
    pub fn submitter(&self) -> CommandSubmitter<S> {
        CommandSubmitter {
            tx: self.tx.clone(),
            closed: Arc::clone(&self.closed),
        }
    }

    /// Wait until every previously submitted operation has executed.
    ///
    /// Returns immediately after shutdown.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.submit(move |_state| {
            Box::pin(async move {
                let _ = done_tx.send(());
            })
        });
        let _ = done_rx.await;
    }

    /// Stop the worker after draining already-queued operations.
    ///
    /// Returns the worker-owned state, or `None` if the worker panicked.
    pub async fn shutdown(self) -> Option<S> {
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.tx.send(Command::Shutdown);
        self.worker.await.ok()
    }
}

/// Cloneable submission endpoint for a [`CommandSerializer`].
///
/// Handed to event listeners so driver callbacks can re-post work onto the
/// worker from whatever thread the driver invokes them on.
pub struct CommandSubmitter<S> {
    tx: mpsc::UnboundedSender<Command<S>>,
    closed: Arc<AtomicBool>,
}

impl<S> Clone for CommandSubmitter<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<S: Send + 'static> CommandSubmitter<S> {
    /// Enqueue an operation; same contract as
    /// [`CommandSerializer::submit`].
    pub fn submit<F>(&self, operation: F)
    where
        F: for<'a> FnOnce(&'a mut S) -> BoxedFuture<'a> + Send + 'static,
    {
        if self.closed.load(Ordering::SeqCst) {
            trace!("dropping submission after shutdown");
            return;
        }
        let _ = self.tx.send(Command::Run(Box::new(operation)));
    }
}
