//! Typed provider handle: the public operation surface.

use crate::bridge::{batch, gate, invoke_stream, ResultStream};
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::provider::{CorrelationId, PackageProvider};
use crate::types::{PackageSource, SoftwareIdentity, VersionFilter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use url::Url;

/// Identifies one loaded provider and exposes its operations as friendly
/// wrappers returning lazy result streams.
///
/// The handle is created once at provider load (see
/// [`load_provider`](crate::provider::load_provider)) and lives for the
/// process. The underlying provider instance is shared across invocations;
/// concurrent overlapping invocations are only safe if the provider itself
/// supports them.
pub struct ProviderHandle {
    name: String,
    provider: Arc<dyn PackageProvider>,
    correlation: AtomicU32,
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("name", &self.name)
            .field("correlation", &self.correlation)
            .finish_non_exhaustive()
    }
}

impl ProviderHandle {
    pub(crate) fn new(name: String, provider: Arc<dyn PackageProvider>) -> Self {
        Self {
            name,
            provider,
            correlation: AtomicU32::new(0),
        }
    }

    /// The provider's declared name, resolved once at load.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allocates a correlation id unique among queries in flight against
    /// this handle.
    fn next_correlation(&self) -> CorrelationId {
        CorrelationId::new(self.correlation.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn check_identity(
        &self,
        identity: &SoftwareIdentity,
        operation: &'static str,
    ) -> Result<()> {
        if identity.provider_name != self.name {
            return Err(Error::argument(
                operation,
                format!(
                    "identity '{}' was produced by provider '{}' and cannot be used with '{}'",
                    identity.name, identity.provider_name, self.name
                ),
            ));
        }
        Ok(())
    }

    // ---- package sources ----

    /// Registers a package source with the provider.
    pub fn add_package_source(
        &self,
        name: &str,
        location: &str,
        trusted: bool,
        ctx: Option<&RequestContext>,
    ) -> ResultStream<PackageSource> {
        let provider = self.provider.clone();
        let name = name.to_string();
        let location = location.to_string();
        invoke_stream(
            &self.name,
            "add_package_source",
            context_or_noop(ctx),
            move |req| provider.add_package_source(&name, &location, trusted, req),
        )
    }

    /// Unregisters a package source.
    pub fn remove_package_source(
        &self,
        name: &str,
        ctx: Option<&RequestContext>,
    ) -> ResultStream<PackageSource> {
        let provider = self.provider.clone();
        let name = name.to_string();
        invoke_stream(
            &self.name,
            "remove_package_source",
            context_or_noop(ctx),
            move |req| provider.remove_package_source(&name, req),
        )
    }

    /// Streams the sources the provider can currently serve packages from.
    pub fn resolve_package_sources(
        &self,
        ctx: Option<&RequestContext>,
    ) -> ResultStream<PackageSource> {
        let provider = self.provider.clone();
        invoke_stream(
            &self.name,
            "resolve_package_sources",
            context_or_noop(ctx),
            move |req| provider.resolve_package_sources(req),
        )
    }

    // ---- discovery ----

    /// Searches for packages by name and version constraints. `None` name
    /// queries with no filter. Pass a correlation id to attach the call to
    /// a batch opened with [`start_find`](Self::start_find).
    pub fn find_package(
        &self,
        name: Option<&str>,
        versions: &VersionFilter,
        correlation: Option<CorrelationId>,
        ctx: Option<&RequestContext>,
    ) -> ResultStream<SoftwareIdentity> {
        self.direct_find(
            name.map(str::to_string),
            versions.clone(),
            correlation,
            context_or_noop(ctx),
        )
    }

    fn direct_find(
        &self,
        name: Option<String>,
        versions: VersionFilter,
        correlation: Option<CorrelationId>,
        ctx: RequestContext,
    ) -> ResultStream<SoftwareIdentity> {
        let provider = self.provider.clone();
        invoke_stream(&self.name, "find_package", ctx, move |req| {
            provider.find_package(name.as_deref(), &versions, correlation, req)
        })
    }

    /// Searches for the package a URI points at. An unsupported scheme
    /// yields an empty stream without invoking the provider; this is not an
    /// error.
    pub fn find_package_by_uri(
        &self,
        uri: &Url,
        correlation: Option<CorrelationId>,
        ctx: Option<&RequestContext>,
    ) -> ResultStream<SoftwareIdentity> {
        if !scheme_supported(self.provider.as_ref(), uri) {
            tracing::debug!(
                provider = %self.name,
                scheme = uri.scheme(),
                "uri scheme not supported; returning empty result"
            );
            return ResultStream::empty();
        }
        let provider = self.provider.clone();
        let uri = uri.clone();
        invoke_stream(
            &self.name,
            "find_package_by_uri",
            context_or_noop(ctx),
            move |req| provider.find_package_by_uri(&uri, correlation, req),
        )
    }

    /// Searches for the package a local file contains. An unsupported
    /// extension yields an empty stream without invoking the provider.
    pub fn find_package_by_file(
        &self,
        path: &Path,
        correlation: Option<CorrelationId>,
        ctx: Option<&RequestContext>,
    ) -> ResultStream<SoftwareIdentity> {
        if !extension_supported(self.provider.as_ref(), path) {
            tracing::debug!(
                provider = %self.name,
                path = %path.display(),
                "file extension not supported; returning empty result"
            );
            return ResultStream::empty();
        }
        let provider = self.provider.clone();
        let path = path.to_path_buf();
        invoke_stream(
            &self.name,
            "find_package_by_file",
            context_or_noop(ctx),
            move |req| provider.find_package_by_file(&path, correlation, req),
        )
    }

    // ---- batched discovery ----

    /// Searches for several package names in one provider-side pass.
    ///
    /// Zero names delegates to the single unfiltered find; one name is a
    /// direct call; two or more run under a fresh correlation id as
    /// StartFind → finds in input order → CompleteFind.
    pub fn find_packages(
        &self,
        names: &[String],
        versions: &VersionFilter,
        ctx: Option<&RequestContext>,
    ) -> Result<ResultStream<SoftwareIdentity>> {
        let ctx = required_context(ctx, "find_packages")?;
        match names {
            [] => Ok(self.direct_find(None, VersionFilter::default(), None, ctx)),
            [name] => Ok(self.direct_find(Some(name.clone()), versions.clone(), None, ctx)),
            _ => {
                let versions = versions.clone();
                Ok(batch::run_batched_find(
                    self.provider.clone(),
                    &self.name,
                    "find_packages",
                    self.next_correlation(),
                    ctx,
                    names.to_vec(),
                    move |provider, name, id, req| {
                        provider.find_package(Some(name.as_str()), &versions, Some(id), req)
                    },
                ))
            }
        }
    }

    /// Searches for the packages several URIs point at in one provider-side
    /// pass. Elements with unsupported schemes are skipped without a
    /// provider call.
    pub fn find_packages_by_uris(
        &self,
        uris: &[Url],
        ctx: Option<&RequestContext>,
    ) -> Result<ResultStream<SoftwareIdentity>> {
        let ctx = required_context(ctx, "find_packages_by_uris")?;
        match uris {
            [] => Ok(self.direct_find(None, VersionFilter::default(), None, ctx)),
            [uri] => Ok(self.find_package_by_uri(uri, None, Some(&ctx))),
            _ => Ok(batch::run_batched_find(
                self.provider.clone(),
                &self.name,
                "find_packages_by_uris",
                self.next_correlation(),
                ctx,
                uris.to_vec(),
                move |provider, uri, id, req| {
                    if !scheme_supported(provider, uri) {
                        tracing::debug!(scheme = uri.scheme(), "skipping unsupported uri scheme");
                        return Ok(());
                    }
                    provider.find_package_by_uri(uri, Some(id), req)
                },
            )),
        }
    }

    /// Searches for the packages several local files contain in one
    /// provider-side pass. Elements with unsupported extensions are skipped
    /// without a provider call.
    pub fn find_packages_by_files(
        &self,
        paths: &[PathBuf],
        ctx: Option<&RequestContext>,
    ) -> Result<ResultStream<SoftwareIdentity>> {
        let ctx = required_context(ctx, "find_packages_by_files")?;
        match paths {
            [] => Ok(self.direct_find(None, VersionFilter::default(), None, ctx)),
            [path] => Ok(self.find_package_by_file(path, None, Some(&ctx))),
            _ => Ok(batch::run_batched_find(
                self.provider.clone(),
                &self.name,
                "find_packages_by_files",
                self.next_correlation(),
                ctx,
                paths.iter().map(|p| DisplayPath(p.clone())).collect(),
                move |provider, path, id, req| {
                    if !extension_supported(provider, &path.0) {
                        tracing::debug!(
                            path = %path.0.display(),
                            "skipping unsupported file extension"
                        );
                        return Ok(());
                    }
                    provider.find_package_by_file(&path.0, Some(id), req)
                },
            )),
        }
    }

    // ---- correlation protocol ----

    /// Opens a batched query and returns its correlation id. The id stays
    /// live on the provider side until [`complete_find`](Self::complete_find)
    /// retires it.
    pub async fn start_find(&self, ctx: Option<&RequestContext>) -> Result<CorrelationId> {
        let ctx = required_context(ctx, "start_find")?;
        let correlation = self.next_correlation();
        let provider = self.provider.clone();
        invoke_stream::<SoftwareIdentity, _>(&self.name, "start_find", ctx, move |req| {
            provider.start_find(correlation, req)
        })
        .wait()
        .await?;
        Ok(correlation)
    }

    /// Closes a batched query, streaming any results the provider buffered
    /// under the id.
    pub fn complete_find(
        &self,
        correlation: CorrelationId,
        ctx: Option<&RequestContext>,
    ) -> ResultStream<SoftwareIdentity> {
        let provider = self.provider.clone();
        invoke_stream(
            &self.name,
            "complete_find",
            context_or_noop(ctx),
            move |req| provider.complete_find(correlation, req),
        )
    }

    // ---- installed state ----

    /// Streams installed packages matching the optional filters.
    pub fn get_installed_packages(
        &self,
        name: Option<&str>,
        versions: &VersionFilter,
        ctx: Option<&RequestContext>,
    ) -> ResultStream<SoftwareIdentity> {
        let provider = self.provider.clone();
        let name = name.map(str::to_string);
        let versions = versions.clone();
        invoke_stream(
            &self.name,
            "get_installed_packages",
            context_or_noop(ctx),
            move |req| provider.get_installed_packages(name.as_deref(), &versions, req),
        )
    }

    /// Streams the direct dependencies of a previously discovered package.
    pub fn get_package_dependencies(
        &self,
        identity: &SoftwareIdentity,
        ctx: Option<&RequestContext>,
    ) -> Result<ResultStream<SoftwareIdentity>> {
        self.check_identity(identity, "get_package_dependencies")?;
        let provider = self.provider.clone();
        let reference = identity.fast_package_reference.clone();
        Ok(invoke_stream(
            &self.name,
            "get_package_dependencies",
            context_or_noop(ctx),
            move |req| provider.get_package_dependencies(&reference, req),
        ))
    }

    // ---- lifecycle ----

    /// Installs a previously discovered package.
    ///
    /// Untrusted identities go through the trust gate first: a declined or
    /// faulting confirmation yields an empty stream and the provider's
    /// install is never invoked.
    pub async fn install_package(
        &self,
        identity: &SoftwareIdentity,
        ctx: Option<&RequestContext>,
    ) -> Result<ResultStream<SoftwareIdentity>> {
        let ctx = required_context(ctx, "install_package")?;
        self.check_identity(identity, "install_package")?;

        if !gate::confirm_install(identity, &ctx).await {
            return Ok(ResultStream::empty());
        }

        let provider = self.provider.clone();
        let reference = identity.fast_package_reference.clone();
        Ok(invoke_stream(
            &self.name,
            "install_package",
            ctx,
            move |req| provider.install_package(&reference, req),
        ))
    }

    /// Uninstalls a previously discovered package.
    pub fn uninstall_package(
        &self,
        identity: &SoftwareIdentity,
        ctx: Option<&RequestContext>,
    ) -> Result<ResultStream<SoftwareIdentity>> {
        self.check_identity(identity, "uninstall_package")?;
        let provider = self.provider.clone();
        let reference = identity.fast_package_reference.clone();
        Ok(invoke_stream(
            &self.name,
            "uninstall_package",
            context_or_noop(ctx),
            move |req| provider.uninstall_package(&reference, req),
        ))
    }

    /// Downloads a previously discovered package to `destination` without
    /// installing it.
    pub fn download_package(
        &self,
        identity: &SoftwareIdentity,
        destination: &Path,
        ctx: Option<&RequestContext>,
    ) -> Result<ResultStream<SoftwareIdentity>> {
        let ctx = required_context(ctx, "download_package")?;
        self.check_identity(identity, "download_package")?;
        let provider = self.provider.clone();
        let reference = identity.fast_package_reference.clone();
        let destination = destination.to_path_buf();
        Ok(invoke_stream(
            &self.name,
            "download_package",
            ctx,
            move |req| provider.download_package(&reference, &destination, req),
        ))
    }

    /// Runs a provider-defined elevated action, suspending the caller until
    /// the provider signals done or faulted.
    pub async fn execute_elevated_action(
        &self,
        payload: serde_json::Value,
        ctx: Option<&RequestContext>,
    ) -> Result<()> {
        let provider = self.provider.clone();
        invoke_stream::<SoftwareIdentity, _>(
            &self.name,
            "execute_elevated_action",
            context_or_noop(ctx),
            move |req| provider.execute_elevated_action(&payload, req),
        )
        .wait()
        .await
    }
}

fn context_or_noop(ctx: Option<&RequestContext>) -> RequestContext {
    ctx.cloned().unwrap_or_else(RequestContext::none)
}

fn required_context(
    ctx: Option<&RequestContext>,
    operation: &'static str,
) -> Result<RequestContext> {
    ctx.cloned()
        .ok_or_else(|| Error::argument(operation, "an explicit request context is required"))
}

fn scheme_supported(provider: &dyn PackageProvider, uri: &Url) -> bool {
    provider
        .supported_uri_schemes()
        .iter()
        .any(|scheme| scheme.eq_ignore_ascii_case(uri.scheme()))
}

fn extension_supported(provider: &dyn PackageProvider, path: &Path) -> bool {
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    provider
        .supported_file_extensions()
        .iter()
        .any(|declared| declared.trim_start_matches('.').eq_ignore_ascii_case(extension))
}

/// Path wrapper so batched file elements can be named in host fault
/// reports.
struct DisplayPath(PathBuf);

impl std::fmt::Display for DisplayPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
