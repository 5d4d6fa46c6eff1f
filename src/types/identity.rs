//! Package identity types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Installation status of a discovered package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationStatus {
    /// Package is available from a source but not installed.
    Available,
    /// Package is installed.
    Installed,
    /// Package was uninstalled by the reporting operation.
    Uninstalled,
    /// Package is installed as a dependency of another package.
    Dependency,
}

impl fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallationStatus::Available => write!(f, "available"),
            InstallationStatus::Installed => write!(f, "installed"),
            InstallationStatus::Uninstalled => write!(f, "uninstalled"),
            InstallationStatus::Dependency => write!(f, "dependency"),
        }
    }
}

/// Canonical descriptor of a discovered or installed package.
///
/// The `fast_package_reference` is an opaque handle minted by the provider
/// that produced this identity; it identifies the package instance for later
/// operations (install/uninstall/download) and is meaningless to any other
/// provider. `provider_name` records the producer so the bridge can reject
/// cross-provider reuse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftwareIdentity {
    /// Package name.
    pub name: String,
    /// Package version string.
    pub version: String,
    /// Name or location of the source this package came from.
    pub source: String,
    /// Opaque provider-specific reference used for later operations.
    pub fast_package_reference: String,
    /// Whether the provider vouches for this package's source.
    pub from_trusted_source: bool,
    /// Current status of the package.
    pub status: InstallationStatus,
    /// Name of the provider that produced this identity.
    pub provider_name: String,
    /// Short human-readable summary.
    pub summary: Option<String>,
    /// Provider-specific metadata.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl SoftwareIdentity {
    /// Creates a new identity with the given core fields. Optional fields
    /// are filled through the `with_*` chainers.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        source: impl Into<String>,
        fast_package_reference: impl Into<String>,
        provider_name: impl Into<String>,
        status: InstallationStatus,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source: source.into(),
            fast_package_reference: fast_package_reference.into(),
            from_trusted_source: false,
            status,
            provider_name: provider_name.into(),
            summary: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_trusted_source(mut self, trusted: bool) -> Self {
        self.from_trusted_source = trusted;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

impl fmt::Display for SoftwareIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.version, self.status)
    }
}

/// Version constraints applied to find and installed-package queries.
///
/// All fields are optional; an empty filter matches every version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFilter {
    /// Exact version required.
    pub required: Option<String>,
    /// Inclusive minimum version.
    pub minimum: Option<String>,
    /// Inclusive maximum version.
    pub maximum: Option<String>,
}

impl VersionFilter {
    pub fn exact(version: impl Into<String>) -> Self {
        Self {
            required: Some(version.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_none() && self.minimum.is_none() && self.maximum.is_none()
    }
}
