//! Correlation-id batching.
//!
//! Fans N logical queries out as one provider-side pass: `start_find(id)`,
//! one find call per element in input order reusing the id, then
//! `complete_find(id)` to flush buffered results. The whole pass is a
//! single bridge invocation, so every call shares one request context and
//! one result stream.

use crate::bridge::{invoke_stream, ProviderRequest, ResultStream};
use crate::context::RequestContext;
use crate::error::Result;
use crate::provider::{CorrelationId, PackageProvider};
use crate::types::SoftwareIdentity;
use std::fmt;
use std::sync::Arc;

/// Runs a batched find pass over `elements`.
///
/// A fault in one element's call does not abort the remaining elements: it
/// is reported through the host and the loop continues. The correlation id
/// is a scoped resource: once `start_find` succeeds, `complete_find` is
/// issued on every exit path, including after element faults and after
/// cancellation, so provider-side accumulation state is never leaked. A
/// fault in `start_find` itself aborts the batch before any id becomes
/// live.
pub(crate) fn run_batched_find<E, F>(
    provider: Arc<dyn PackageProvider>,
    provider_name: &str,
    operation: &'static str,
    correlation: CorrelationId,
    ctx: RequestContext,
    elements: Vec<E>,
    issue: F,
) -> ResultStream<SoftwareIdentity>
where
    E: fmt::Display + Send + 'static,
    F: Fn(&dyn PackageProvider, &E, CorrelationId, &ProviderRequest<SoftwareIdentity>) -> Result<()>
        + Send
        + 'static,
{
    tracing::debug!(
        provider = provider_name,
        operation,
        correlation = %correlation,
        elements = elements.len(),
        "starting batched find"
    );

    invoke_stream(provider_name, operation, ctx, move |request| {
        provider.start_find(correlation, request)?;

        for element in &elements {
            if request.is_cancelled() {
                break;
            }
            if let Err(err) = issue(provider.as_ref(), element, correlation, request) {
                request.error(format!("{operation} failed for '{element}': {err}"));
            }
        }

        provider.complete_find(correlation, request)
    })
}
