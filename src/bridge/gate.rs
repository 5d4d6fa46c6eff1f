//! Trust-confirmation gate.
//!
//! Guards the install operation: a package from an untrusted source only
//! reaches the provider after the host confirms it. The confirmation prompt
//! is synchronous host code, so it runs on a blocking worker.

use crate::context::RequestContext;
use crate::types::SoftwareIdentity;

/// Returns whether the install may proceed.
///
/// Trusted identities pass directly. For untrusted ones the host is asked;
/// a decline emits one warning citing the package name and a faulting (or
/// panicking) prompt is swallowed. In both cases the caller returns an
/// empty stream and the provider's install is never invoked.
pub(crate) async fn confirm_install(identity: &SoftwareIdentity, ctx: &RequestContext) -> bool {
    if identity.from_trusted_source {
        return true;
    }

    let host = ctx.host().clone();
    let package = identity.name.clone();
    let source = identity.source.clone();
    let decision = tokio::task::spawn_blocking(move || {
        host.should_continue_with_untrusted_package_source(&package, &source)
    })
    .await;

    match decision {
        Ok(Ok(true)) => true,
        Ok(Ok(false)) => {
            ctx.host().warning(format!(
                "Installation of package '{}' from untrusted source '{}' was declined",
                identity.name, identity.source
            ));
            false
        }
        Ok(Err(err)) => {
            tracing::debug!(
                package = %identity.name,
                error = %err,
                "untrusted-source confirmation faulted; declining install"
            );
            false
        }
        Err(_join) => {
            tracing::debug!(
                package = %identity.name,
                "untrusted-source confirmation panicked; declining install"
            );
            false
        }
    }
}
