//! Package source types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered or discoverable package source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSource {
    /// Source name (e.g., "nuget.org").
    pub name: String,
    /// Source location (URL or filesystem path).
    pub location: String,
    /// Whether packages from this source are trusted without confirmation.
    pub trusted: bool,
}

impl PackageSource {
    pub fn new(name: impl Into<String>, location: impl Into<String>, trusted: bool) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            trusted,
        }
    }
}

impl fmt::Display for PackageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}
