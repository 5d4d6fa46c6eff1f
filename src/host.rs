//! Host reporting contract.
//!
//! Provides the `HostReporter` trait consumed by every provider invocation,
//! and `NoopHost`, the minimal implementation substituted when a caller
//! omits the request context.

use crate::Result;

/// Reporting capability supplied by the host application.
///
/// Implementations receive diagnostics emitted while a provider call is in
/// flight and answer the untrusted-source confirmation prompt. All methods
/// are synchronous; they are called from the provider's worker thread.
pub trait HostReporter: Send + Sync {
    /// Emit a warning message. Callers substitute arguments with `format!`.
    fn warning(&self, message: String);

    /// Emit an error message.
    fn error(&self, message: String);

    /// Ask the user whether to continue installing a package from an
    /// untrusted source. Returning `Ok(false)` declines the install; an
    /// `Err` is treated as a decline and swallowed by the trust gate.
    fn should_continue_with_untrusted_package_source(
        &self,
        package: &str,
        source: &str,
    ) -> Result<bool>;
}

/// Host that discards diagnostics and declines every confirmation.
///
/// Used for the substituted no-op request context. Messages are not lost
/// silently: they are forwarded to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct NoopHost;

impl HostReporter for NoopHost {
    fn warning(&self, message: String) {
        tracing::debug!(target: "pkg_bridge::host", "discarded warning: {message}");
    }

    fn error(&self, message: String) {
        tracing::debug!(target: "pkg_bridge::host", "discarded error: {message}");
    }

    fn should_continue_with_untrusted_package_source(
        &self,
        package: &str,
        source: &str,
    ) -> Result<bool> {
        tracing::debug!(
            target: "pkg_bridge::host",
            package,
            source,
            "no host attached; declining untrusted source"
        );
        Ok(false)
    }
}
