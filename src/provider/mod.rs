//! Provider contract and typed handles.
//!
//! A provider is a plugin implementing package-management operations for one
//! ecosystem. The contract is the statically-typed [`PackageProvider`]
//! trait: synchronous, callback-reporting operations that push zero or more
//! results (or one completion) through the [`ProviderRequest`] they receive.
//! None of the operations return values directly.
//!
//! [`loader::load_provider`] validates a provider's declared operation set
//! at load time and exposes it as a [`handle::ProviderHandle`].

pub mod capabilities;
pub mod handle;
pub mod loader;

pub use capabilities::ProviderOperation;
pub use handle::ProviderHandle;
pub use loader::load_provider;

use crate::bridge::ProviderRequest;
use crate::error::{Error, Result};
use crate::types::{PackageSource, SoftwareIdentity, VersionFilter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use url::Url;

/// Opaque integer token grouping multiple provider calls into one logical
/// batched query (StartFind…CompleteFind).
///
/// Ids are minted by the handle's per-provider counter; they are unique
/// among queries concurrently in flight against the same handle and are
/// meaningless across handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(u32);

impl CorrelationId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The package provider plugin contract.
///
/// All operations are synchronous and run on the bridge's blocking worker;
/// results are reported through the given request, in the order they should
/// reach the consumer. Operations with a default body are optional: a
/// provider that supports one must both override it and include it in
/// [`supported_operations`](Self::supported_operations).
///
/// Status-tag contract: a single operation reports identities of consistent
/// status (finds report `Available`, installed queries report `Installed`
/// or `Dependency`, uninstalls report `Uninstalled`); an operation must not
/// mix in identities of an unrelated status.
pub trait PackageProvider: Send + Sync {
    /// Declared provider name. Resolved once at load and cached by the
    /// handle.
    fn name(&self) -> &str;

    /// The operations this provider implements. Validated against the
    /// required core at load time.
    fn supported_operations(&self) -> Vec<ProviderOperation>;

    /// URI schemes `find_package_by_uri` understands. Empty means the
    /// by-uri path is never taken.
    fn supported_uri_schemes(&self) -> Vec<String> {
        Vec::new()
    }

    /// File extensions `find_package_by_file` understands, with or without
    /// a leading dot. Empty means the by-file path is never taken.
    fn supported_file_extensions(&self) -> Vec<String> {
        Vec::new()
    }

    /// Registers a package source, reporting the registered source.
    fn add_package_source(
        &self,
        name: &str,
        location: &str,
        trusted: bool,
        request: &ProviderRequest<PackageSource>,
    ) -> Result<()> {
        let _ = (name, location, trusted, request);
        Err(Error::unsupported(
            self.name(),
            ProviderOperation::AddPackageSource,
        ))
    }

    /// Unregisters a package source, reporting the removed source.
    fn remove_package_source(
        &self,
        name: &str,
        request: &ProviderRequest<PackageSource>,
    ) -> Result<()> {
        let _ = (name, request);
        Err(Error::unsupported(
            self.name(),
            ProviderOperation::RemovePackageSource,
        ))
    }

    /// Reports the sources this provider can currently serve packages from.
    fn resolve_package_sources(&self, request: &ProviderRequest<PackageSource>) -> Result<()>;

    /// Searches for packages matching the optional name and version
    /// constraints. When `correlation` is set, results may be buffered
    /// provider-side until `complete_find` flushes that id.
    fn find_package(
        &self,
        name: Option<&str>,
        versions: &VersionFilter,
        correlation: Option<CorrelationId>,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()>;

    /// Searches for the package a URI points at. Only called for schemes in
    /// [`supported_uri_schemes`](Self::supported_uri_schemes).
    fn find_package_by_uri(
        &self,
        uri: &Url,
        correlation: Option<CorrelationId>,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        let _ = (uri, correlation, request);
        Err(Error::unsupported(
            self.name(),
            ProviderOperation::FindPackageByUri,
        ))
    }

    /// Searches for the package a local file contains. Only called for
    /// extensions in
    /// [`supported_file_extensions`](Self::supported_file_extensions).
    fn find_package_by_file(
        &self,
        path: &Path,
        correlation: Option<CorrelationId>,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        let _ = (path, correlation, request);
        Err(Error::unsupported(
            self.name(),
            ProviderOperation::FindPackageByFile,
        ))
    }

    /// Reports installed packages matching the optional filters.
    fn get_installed_packages(
        &self,
        name: Option<&str>,
        versions: &VersionFilter,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()>;

    /// Reports the direct dependencies of the referenced package.
    fn get_package_dependencies(
        &self,
        fast_package_reference: &str,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        let _ = (fast_package_reference, request);
        Err(Error::unsupported(
            self.name(),
            ProviderOperation::GetPackageDependencies,
        ))
    }

    /// Opens a batched query. The id was minted by the handle; subsequent
    /// find calls carrying it belong to this batch until `complete_find`.
    fn start_find(
        &self,
        correlation: CorrelationId,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()>;

    /// Closes a batched query, flushing any results buffered under the id.
    fn complete_find(
        &self,
        correlation: CorrelationId,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()>;

    /// Installs the referenced package, reporting what was installed. The
    /// trust gate has already run by the time this is called.
    fn install_package(
        &self,
        fast_package_reference: &str,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()>;

    /// Uninstalls the referenced package, reporting what was removed.
    fn uninstall_package(
        &self,
        fast_package_reference: &str,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()>;

    /// Downloads the referenced package to `destination` without
    /// installing it.
    fn download_package(
        &self,
        fast_package_reference: &str,
        destination: &Path,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        let _ = (fast_package_reference, destination, request);
        Err(Error::unsupported(
            self.name(),
            ProviderOperation::DownloadPackage,
        ))
    }

    /// Runs a provider-defined elevated action described by `payload`.
    /// Completion-only: the caller blocks until the provider is done.
    fn execute_elevated_action(
        &self,
        payload: &serde_json::Value,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        let _ = (payload, request);
        Err(Error::unsupported(
            self.name(),
            ProviderOperation::ExecuteElevatedAction,
        ))
    }
}
