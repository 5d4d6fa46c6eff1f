use crate::provider::ProviderOperation;
use thiserror::Error;

/// Unified error type for the provider bridge runtime.
///
/// This aggregates load-time, argument, and provider-reported failures into
/// actionable, high-level categories. Provider faults travel as terminal
/// stream items; everything else is returned eagerly from the operation.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation was invoked with a missing or invalid argument. Raised
    /// before any provider interaction.
    #[error("Invalid argument for {operation}: {message}")]
    Argument {
        operation: &'static str,
        message: String,
    },

    /// A fault reported by the provider while servicing a call.
    #[error("Provider '{provider}' failed during {operation}: {message}")]
    Provider {
        provider: String,
        operation: &'static str,
        message: String,
    },

    /// The provider panicked inside a call. The panic is contained by the
    /// bridge and delivered as a terminal fault on the result sequence.
    #[error("Provider '{provider}' panicked during {operation}")]
    ProviderPanic {
        provider: String,
        operation: &'static str,
    },

    /// An optional operation was invoked on a provider that does not
    /// implement it.
    #[error("Provider '{provider}' does not support {operation}")]
    Unsupported {
        provider: String,
        operation: ProviderOperation,
    },

    /// Load-time capability validation failed.
    #[error("Provider '{provider}' is missing required operations: {}", format_operations(.missing))]
    Capability {
        provider: String,
        missing: Vec<ProviderOperation>,
    },

    /// The operation was cancelled through its request context.
    #[error("Operation cancelled")]
    Cancelled,
}

fn format_operations(ops: &[ProviderOperation]) -> String {
    ops.iter()
        .map(|op| op.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    pub fn argument(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Argument {
            operation,
            message: message.into(),
        }
    }

    pub fn provider(
        provider: impl Into<String>,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Error::Provider {
            provider: provider.into(),
            operation,
            message: message.into(),
        }
    }

    pub fn provider_panic(provider: impl Into<String>, operation: &'static str) -> Self {
        Error::ProviderPanic {
            provider: provider.into(),
            operation,
        }
    }

    pub fn unsupported(provider: impl Into<String>, operation: ProviderOperation) -> Self {
        Error::Unsupported {
            provider: provider.into(),
            operation,
        }
    }

    /// True when the error originated inside a provider call rather than in
    /// the bridge or its arguments.
    pub fn is_provider_fault(&self) -> bool {
        matches!(self, Error::Provider { .. } | Error::ProviderPanic { .. })
    }
}

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;
