//! Load-time provider validation.

use crate::error::{Error, Result};
use crate::provider::capabilities::missing_required;
use crate::provider::handle::ProviderHandle;
use crate::provider::PackageProvider;
use std::sync::Arc;

/// Validates a provider implementation and exposes it as a typed handle.
///
/// Validation runs once, at load: the declared operation set must cover the
/// required core and the name must be non-empty. Failures surface here, not
/// on the first call. The returned handle caches the resolved name for the
/// life of the process.
pub fn load_provider(provider: Arc<dyn PackageProvider>) -> Result<ProviderHandle> {
    let name = provider.name().trim().to_string();
    if name.is_empty() {
        return Err(Error::argument(
            "load_provider",
            "provider name must not be empty",
        ));
    }

    let declared = provider.supported_operations();
    let missing = missing_required(&declared);
    if !missing.is_empty() {
        return Err(Error::Capability {
            provider: name,
            missing,
        });
    }

    tracing::info!(
        provider = %name,
        operations = declared.len(),
        "provider loaded"
    );
    Ok(ProviderHandle::new(name, provider))
}
