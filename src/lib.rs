//! # pkg-bridge
//!
//! Provider bridge runtime for pluggable package management.
//!
//! This library is the bridging layer between a package-management host and
//! provider plugins. A provider exposes synchronous, callback-reporting
//! operations (find, install, resolve sources); the host consumes results
//! as lazily-pulled, cancellable sequences.
//!
//! ## Overview
//!
//! - **Callback-to-stream bridging**: every provider invocation runs on a
//!   blocking worker and its reported results stream to the consumer over a
//!   bounded channel, without blocking the provider's reporting thread.
//! - **Correlation batching**: several logical queries are issued as one
//!   provider-side StartFind → finds → CompleteFind pass sharing a
//!   correlation id.
//! - **Trust gate**: installs from untrusted sources only reach the
//!   provider after the host confirms them.
//! - **Load-time capability validation**: a provider's declared operation
//!   set is checked when the provider is loaded, not when an operation is
//!   first invoked.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use pkg_bridge::{load_provider, PackageProvider, VersionFilter};
//! use std::sync::Arc;
//!
//! # async fn example(my_provider: Arc<dyn PackageProvider>) -> pkg_bridge::Result<()> {
//! let handle = load_provider(my_provider)?;
//!
//! let mut results = handle.find_package(Some("zlib"), &VersionFilter::default(), None, None);
//! while let Some(identity) = results.next().await {
//!     println!("found {}", identity?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`provider`] | Provider contract, capability validation, typed handle |
//! | [`bridge`] | Callback-to-stream bridging, batching, trust gate |
//! | [`types`] | Core type definitions (identities, sources, filters) |
//! | [`host`] | Host reporting contract |
//! | [`context`] | Per-operation request context and cancellation |

pub mod bridge;
pub mod context;
pub mod host;
pub mod provider;
pub mod types;

/// Error type for the library
pub mod error;

// Re-export main types for convenience
pub use bridge::{ProviderRequest, ResultStream};
pub use context::{cancel_pair, CancelHandle, CancelSignal, RequestContext};
pub use error::{Error, Result};
pub use host::{HostReporter, NoopHost};
pub use provider::{
    load_provider, CorrelationId, PackageProvider, ProviderHandle, ProviderOperation,
};
pub use types::{InstallationStatus, PackageSource, SoftwareIdentity, VersionFilter};
