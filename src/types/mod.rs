//! Core type definitions (identities, sources, version filters).

pub mod identity;
pub mod source;

pub use identity::{InstallationStatus, SoftwareIdentity, VersionFilter};
pub use source::PackageSource;
