//! Shared mock provider and recording host for the integration tests.

#![allow(dead_code)]

use pkg_bridge::bridge::ProviderRequest;
use pkg_bridge::{
    CorrelationId, Error, HostReporter, InstallationStatus, PackageProvider, PackageSource,
    ProviderOperation, Result, SoftwareIdentity, VersionFilter,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

pub const PROVIDER_NAME: &str = "mock";

/// One recorded provider interaction, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    StartFind(u32),
    CompleteFind(u32),
    FindPackage {
        name: Option<String>,
        correlation: Option<u32>,
    },
    FindByUri {
        uri: String,
        correlation: Option<u32>,
    },
    FindByFile {
        path: String,
        correlation: Option<u32>,
    },
    GetInstalled {
        name: Option<String>,
    },
    Dependencies {
        reference: String,
    },
    Install {
        reference: String,
    },
    Uninstall {
        reference: String,
    },
    Download {
        reference: String,
    },
    AddSource {
        name: String,
    },
    RemoveSource {
        name: String,
    },
    ResolveSources,
    Elevated,
}

pub struct MockProvider {
    calls: Mutex<Vec<Call>>,
    fail_finds: HashSet<String>,
    flush_on_complete: bool,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_finds: HashSet::new(),
            flush_on_complete: false,
        })
    }

    /// A provider whose `find_package` faults for the given names.
    pub fn failing_finds(names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_finds: names.iter().map(|n| n.to_string()).collect(),
            flush_on_complete: false,
        })
    }

    /// A provider that buffers nothing but reports one flushed identity
    /// from `complete_find`.
    pub fn flushing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_finds: HashSet::new(),
            flush_on_complete: true,
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn available(name: &str) -> SoftwareIdentity {
        SoftwareIdentity::new(
            name,
            "1.0.0",
            "mock-source",
            format!("ref:{name}/1.0.0"),
            PROVIDER_NAME,
            InstallationStatus::Available,
        )
    }
}

impl PackageProvider for MockProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn supported_operations(&self) -> Vec<ProviderOperation> {
        vec![
            ProviderOperation::AddPackageSource,
            ProviderOperation::RemovePackageSource,
            ProviderOperation::ResolvePackageSources,
            ProviderOperation::FindPackage,
            ProviderOperation::FindPackageByUri,
            ProviderOperation::FindPackageByFile,
            ProviderOperation::GetInstalledPackages,
            ProviderOperation::GetPackageDependencies,
            ProviderOperation::StartFind,
            ProviderOperation::CompleteFind,
            ProviderOperation::InstallPackage,
            ProviderOperation::UninstallPackage,
            ProviderOperation::DownloadPackage,
            ProviderOperation::ExecuteElevatedAction,
        ]
    }

    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["https".to_string()]
    }

    fn supported_file_extensions(&self) -> Vec<String> {
        vec![".nupkg".to_string()]
    }

    fn add_package_source(
        &self,
        name: &str,
        location: &str,
        trusted: bool,
        request: &ProviderRequest<PackageSource>,
    ) -> Result<()> {
        self.record(Call::AddSource {
            name: name.to_string(),
        });
        request.yield_result(PackageSource::new(name, location, trusted));
        Ok(())
    }

    fn remove_package_source(
        &self,
        name: &str,
        request: &ProviderRequest<PackageSource>,
    ) -> Result<()> {
        self.record(Call::RemoveSource {
            name: name.to_string(),
        });
        request.yield_result(PackageSource::new(name, "removed", false));
        Ok(())
    }

    fn resolve_package_sources(&self, request: &ProviderRequest<PackageSource>) -> Result<()> {
        self.record(Call::ResolveSources);
        request.yield_result(PackageSource::new("mock-source", "https://mock.example", true));
        request.yield_result(PackageSource::new("extras", "https://extras.example", false));
        Ok(())
    }

    fn find_package(
        &self,
        name: Option<&str>,
        _versions: &VersionFilter,
        correlation: Option<CorrelationId>,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::FindPackage {
            name: name.map(str::to_string),
            correlation: correlation.map(|c| c.value()),
        });
        if let Some(name) = name {
            if self.fail_finds.contains(name) {
                return Err(Error::provider(PROVIDER_NAME, "find_package", "backend exploded"));
            }
            request.yield_result(Self::available(name));
        } else {
            request.yield_result(Self::available("everything"));
        }
        Ok(())
    }

    fn find_package_by_uri(
        &self,
        uri: &Url,
        correlation: Option<CorrelationId>,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::FindByUri {
            uri: uri.to_string(),
            correlation: correlation.map(|c| c.value()),
        });
        request.yield_result(Self::available("from-uri"));
        Ok(())
    }

    fn find_package_by_file(
        &self,
        path: &Path,
        correlation: Option<CorrelationId>,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::FindByFile {
            path: path.display().to_string(),
            correlation: correlation.map(|c| c.value()),
        });
        request.yield_result(Self::available("from-file"));
        Ok(())
    }

    fn get_installed_packages(
        &self,
        name: Option<&str>,
        _versions: &VersionFilter,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::GetInstalled {
            name: name.map(str::to_string),
        });
        let mut installed = Self::available("zlib");
        installed.status = InstallationStatus::Installed;
        request.yield_result(installed);
        Ok(())
    }

    fn get_package_dependencies(
        &self,
        fast_package_reference: &str,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::Dependencies {
            reference: fast_package_reference.to_string(),
        });
        let mut dep = Self::available("dependency");
        dep.status = InstallationStatus::Dependency;
        request.yield_result(dep);
        Ok(())
    }

    fn start_find(
        &self,
        correlation: CorrelationId,
        _request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::StartFind(correlation.value()));
        Ok(())
    }

    fn complete_find(
        &self,
        correlation: CorrelationId,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::CompleteFind(correlation.value()));
        if self.flush_on_complete {
            request.yield_result(Self::available("flushed"));
        }
        Ok(())
    }

    fn install_package(
        &self,
        fast_package_reference: &str,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::Install {
            reference: fast_package_reference.to_string(),
        });
        let mut installed = Self::available("installed");
        installed.status = InstallationStatus::Installed;
        request.yield_result(installed);
        Ok(())
    }

    fn uninstall_package(
        &self,
        fast_package_reference: &str,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::Uninstall {
            reference: fast_package_reference.to_string(),
        });
        let mut removed = Self::available("removed");
        removed.status = InstallationStatus::Uninstalled;
        request.yield_result(removed);
        Ok(())
    }

    fn download_package(
        &self,
        fast_package_reference: &str,
        _destination: &Path,
        request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::Download {
            reference: fast_package_reference.to_string(),
        });
        request.yield_result(Self::available("downloaded"));
        Ok(())
    }

    fn execute_elevated_action(
        &self,
        _payload: &serde_json::Value,
        _request: &ProviderRequest<SoftwareIdentity>,
    ) -> Result<()> {
        self.record(Call::Elevated);
        Ok(())
    }
}

/// How the recording host answers the untrusted-source prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accept,
    Decline,
    Fault,
    Panic,
}

pub struct RecordingHost {
    pub confirmation: Confirmation,
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    prompts: AtomicUsize,
}

impl RecordingHost {
    pub fn new(confirmation: Confirmation) -> Arc<Self> {
        Arc::new(Self {
            confirmation,
            warnings: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            prompts: AtomicUsize::new(0),
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl HostReporter for RecordingHost {
    fn warning(&self, message: String) {
        self.warnings.lock().unwrap().push(message);
    }

    fn error(&self, message: String) {
        self.errors.lock().unwrap().push(message);
    }

    fn should_continue_with_untrusted_package_source(
        &self,
        _package: &str,
        _source: &str,
    ) -> Result<bool> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        match self.confirmation {
            Confirmation::Accept => Ok(true),
            Confirmation::Decline => Ok(false),
            Confirmation::Fault => Err(Error::argument("prompt", "host prompt unavailable")),
            Confirmation::Panic => panic!("host prompt crashed"),
        }
    }
}

/// Initialise test logging once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
