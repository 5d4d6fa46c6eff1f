//! Callback-to-stream bridging.
//!
//! A provider operation is synchronous and reports results through
//! callbacks; the host consumes them as a lazy, cancellable async stream.
//! The bridge runs the provider call on a blocking worker (the producer
//! role), pushes reported items through a bounded channel, and hands the
//! consumer a [`ResultStream`] that pulls from the other end. A fault inside
//! the provider call is delivered as a terminal `Err` item on the channel,
//! observable only when the consumer pulls past the failure point; it never
//! takes the bridge down with it.

pub(crate) mod batch;
pub(crate) mod gate;

use crate::context::{CancelSignal, RequestContext};
use crate::error::{Error, Result};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Capacity of the bounded channel between the provider's worker thread and
/// the consuming stream. Once the consumer falls this far behind,
/// backpressure suspends the reporting thread, never the bridge.
const RESULT_CHANNEL_CAPACITY: usize = 64;

/// Provider-side view of one in-flight invocation.
///
/// Every provider operation receives a `ProviderRequest`; it reports results
/// and diagnostics through it and observes the caller's cancellation signal.
/// Methods on this type block the reporting thread and must only be called
/// from the worker the bridge runs the provider on.
pub struct ProviderRequest<T> {
    tx: mpsc::Sender<Result<T>>,
    ctx: RequestContext,
}

impl<T: Send + 'static> ProviderRequest<T> {
    fn new(tx: mpsc::Sender<Result<T>>, ctx: RequestContext) -> Self {
        Self { tx, ctx }
    }

    /// Reports one result to the consumer, blocking while the consumer is
    /// behind. Returns `false` once the operation is cancelled or the
    /// consumer is gone; providers should stop reporting at that point.
    pub fn yield_result(&self, item: T) -> bool {
        if self.ctx.is_cancelled() {
            return false;
        }
        self.tx.blocking_send(Ok(item)).is_ok()
    }

    /// Emits a warning through the host attached to the request context.
    pub fn warning(&self, message: String) {
        self.ctx.host().warning(message);
    }

    /// Emits an error message through the host attached to the request
    /// context. Reporting an error does not terminate the stream; return
    /// `Err` from the operation for that.
    pub fn error(&self, message: String) {
        self.ctx.host().error(message);
    }

    /// Whether the caller has cancelled the operation.
    pub fn is_cancelled(&self) -> bool {
        self.ctx.is_cancelled()
    }

    /// Id of the public operation this call belongs to.
    pub fn request_id(&self) -> &str {
        self.ctx.request_id()
    }

    fn fault(&self, err: Error) {
        let _ = self.tx.blocking_send(Err(err));
    }
}

/// Lazy, pull-based sequence of provider results.
///
/// Pulling is the sole suspension point: a pull blocks until the producer
/// pushes an item, signals completion, or signals a fault. Once the
/// operation's cancellation signal fires, no further items are delivered.
pub struct ResultStream<T> {
    rx: mpsc::Receiver<Result<T>>,
    cancel: CancelSignal,
    done: bool,
}

impl<T> ResultStream<T> {
    fn new(rx: mpsc::Receiver<Result<T>>, cancel: CancelSignal) -> Self {
        Self {
            rx,
            cancel,
            done: false,
        }
    }

    /// A stream that completes immediately without yielding anything.
    pub(crate) fn empty() -> Self {
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        Self::new(rx, CancelSignal::never())
    }

    /// Blocking variant of consumption: suspends the caller until the
    /// underlying sequence signals done or faulted, discarding yielded
    /// items. Used for operations with no meaningful result stream.
    pub async fn wait(mut self) -> Result<()> {
        use futures::StreamExt;
        while let Some(item) = self.next().await {
            item?;
        }
        Ok(())
    }
}

impl<T> Stream for ResultStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        if this.cancel.is_cancelled() {
            this.done = true;
            this.rx.close();
            return Poll::Ready(None);
        }
        match this.rx.poll_recv(cx) {
            Poll::Ready(None) => {
                this.done = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

/// Invokes one provider operation against a blocking worker and exposes its
/// reported results as a lazy sequence.
///
/// The returned stream must be created inside a tokio runtime. A provider
/// panic is contained: the join handle is watched by a monitor task and the
/// panic surfaces as a terminal [`Error::ProviderPanic`] item.
pub(crate) fn invoke_stream<T, F>(
    provider_name: &str,
    operation: &'static str,
    ctx: RequestContext,
    call: F,
) -> ResultStream<T>
where
    T: Send + 'static,
    F: FnOnce(&ProviderRequest<T>) -> Result<()> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
    let cancel = ctx.cancel_signal().clone();
    tracing::debug!(
        provider = provider_name,
        operation,
        request_id = ctx.request_id(),
        "invoking provider operation"
    );

    let request = ProviderRequest::new(tx.clone(), ctx);
    let worker = tokio::task::spawn_blocking(move || {
        if let Err(err) = call(&request) {
            tracing::debug!(operation, error = %err, "provider call faulted");
            request.fault(err);
        }
    });

    let provider_name = provider_name.to_string();
    tokio::spawn(async move {
        if let Err(join_err) = worker.await {
            if join_err.is_panic() {
                tracing::warn!(
                    provider = %provider_name,
                    operation,
                    "provider panicked; surfacing as stream fault"
                );
                let _ = tx
                    .send(Err(Error::provider_panic(provider_name, operation)))
                    .await;
            }
        }
    });

    ResultStream::new(rx, cancel)
}
