//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered through `RUST_LOG` or the configured level
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use pharmastore::logging::init_logging;
//! use pharmastore::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the dispatch of a document-store call
///
/// # Example
///
/// ```no_run
/// use pharmastore::log_store_dispatch;
///
/// log_store_dispatch!("update", "/pharma/1");
/// ```
#[macro_export]
macro_rules! log_store_dispatch {
    ($operation:expr, $path:expr) => {
        tracing::debug!(
            operation = %$operation,
            path = %$path,
            "Dispatching document store request"
        );
    };
}

/// Log the envelope produced by a repository or audit call
///
/// Successes go to `debug`, failures to `warn` with the fault category.
///
/// # Example
///
/// ```no_run
/// use pharmastore::log_store_outcome;
/// use pharmastore::domain::ResponseEnvelope;
///
/// let envelope = ResponseEnvelope::success("{}");
/// log_store_outcome!("read", "/pharma/1", &envelope);
/// ```
#[macro_export]
macro_rules! log_store_outcome {
    ($operation:expr, $path:expr, $envelope:expr) => {{
        let envelope: &$crate::domain::ResponseEnvelope = $envelope;
        match envelope.fault_kind() {
            None => tracing::debug!(
                operation = %$operation,
                path = %$path,
                "Document store call succeeded"
            ),
            Some(kind) => tracing::warn!(
                operation = %$operation,
                path = %$path,
                fault_kind = %kind,
                retryable = kind.is_retryable(),
                reason = envelope.failure_reason().unwrap_or_default(),
                "Document store call failed"
            ),
        }
    }};
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use pharmastore::log_error_with_context;
/// use pharmastore::domain::PharmaError;
///
/// let error = PharmaError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{ResponseEnvelope, StoreFault};

    #[test]
    fn test_macros_accept_envelopes() {
        let ok = ResponseEnvelope::success("{}");
        let failed = ResponseEnvelope::failure(&StoreFault::Cancelled);
        crate::log_store_dispatch!("read", "/pharma/1");
        crate::log_store_outcome!("read", "/pharma/1", &ok);
        crate::log_store_outcome!("read", "/pharma/1", &failed);
    }
}
