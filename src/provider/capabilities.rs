//! Provider capability declarations.
//!
//! Each provider declares the set of operations it implements; the loader
//! validates the declared set against the required core at load time so
//! missing capabilities surface when the provider is registered, not when
//! an operation is first invoked.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiers for the operations of the provider contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOperation {
    AddPackageSource,
    RemovePackageSource,
    ResolvePackageSources,
    FindPackage,
    FindPackageByUri,
    FindPackageByFile,
    GetInstalledPackages,
    GetPackageDependencies,
    StartFind,
    CompleteFind,
    InstallPackage,
    UninstallPackage,
    DownloadPackage,
    ExecuteElevatedAction,
}

impl ProviderOperation {
    /// Operations every provider must implement.
    pub const REQUIRED: &'static [ProviderOperation] = &[
        ProviderOperation::ResolvePackageSources,
        ProviderOperation::FindPackage,
        ProviderOperation::GetInstalledPackages,
        ProviderOperation::StartFind,
        ProviderOperation::CompleteFind,
        ProviderOperation::InstallPackage,
        ProviderOperation::UninstallPackage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddPackageSource => "add_package_source",
            Self::RemovePackageSource => "remove_package_source",
            Self::ResolvePackageSources => "resolve_package_sources",
            Self::FindPackage => "find_package",
            Self::FindPackageByUri => "find_package_by_uri",
            Self::FindPackageByFile => "find_package_by_file",
            Self::GetInstalledPackages => "get_installed_packages",
            Self::GetPackageDependencies => "get_package_dependencies",
            Self::StartFind => "start_find",
            Self::CompleteFind => "complete_find",
            Self::InstallPackage => "install_package",
            Self::UninstallPackage => "uninstall_package",
            Self::DownloadPackage => "download_package",
            Self::ExecuteElevatedAction => "execute_elevated_action",
        }
    }

    /// Whether this operation belongs to the required core.
    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the required operations missing from a declared set.
pub(crate) fn missing_required(declared: &[ProviderOperation]) -> Vec<ProviderOperation> {
    ProviderOperation::REQUIRED
        .iter()
        .copied()
        .filter(|op| !declared.contains(op))
        .collect()
}
