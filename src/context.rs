//! Per-operation request context.
//!
//! A `RequestContext` bundles the host reporting capability with a
//! cancellation signal. It is created once per public operation and shared
//! by every provider call issued within that operation; it is discarded when
//! the operation's stream is exhausted or cancelled.

use crate::host::{HostReporter, NoopHost};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

static NOOP_HOST: Lazy<Arc<NoopHost>> = Lazy::new(|| Arc::new(NoopHost));

/// Creates a linked cancellation handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (
        CancelHandle { tx: Arc::new(tx) },
        CancelSignal { rx },
    )
}

/// Caller-side handle used to cancel an in-flight operation.
#[derive(Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &*self.tx.borrow())
            .finish()
    }
}

/// Observer side of the cancellation signal, shared between the consumer
/// stream and the provider's worker thread.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// A signal that can never fire. Dropping the sender of a watch channel
    /// leaves the last value observable, so the flag stays `false` forever.
    pub(crate) fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }
}

/// The per-call bundle of host reporting capability and cancellation signal
/// passed into every provider invocation.
#[derive(Clone)]
pub struct RequestContext {
    request_id: Arc<str>,
    host: Arc<dyn HostReporter>,
    cancel: CancelSignal,
}

impl RequestContext {
    /// Creates a context backed by the given host, returning it together
    /// with the handle that cancels it.
    pub fn new(host: Arc<dyn HostReporter>) -> (Self, CancelHandle) {
        let (handle, signal) = cancel_pair();
        let ctx = Self {
            request_id: Uuid::new_v4().to_string().into(),
            host,
            cancel: signal,
        };
        (ctx, handle)
    }

    /// The minimal no-op context substituted when a caller omits the
    /// context on an operation that does not require one: diagnostics are
    /// discarded, confirmations decline, and cancellation never fires.
    pub fn none() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string().into(),
            host: NOOP_HOST.clone() as Arc<dyn HostReporter>,
            cancel: CancelSignal::never(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn host(&self) -> &Arc<dyn HostReporter> {
        &self.host
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
