//! Domain error types
//!
//! Two families live here. [`PharmaError`] covers everything outside the
//! document-store call path (configuration, validation, local I/O).
//! [`StoreFault`] classifies what can go wrong during a single repository or
//! audit call; those faults are never returned as `Err` by the repository,
//! they are folded into a failure [`ResponseEnvelope`](super::ResponseEnvelope).

use serde::Serialize;
use thiserror::Error;

/// Main PharmaStore error type
#[derive(Debug, Error)]
pub enum PharmaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fault raised while talking to the document store
    #[error("Document store error: {0}")]
    Store(#[from] StoreFault),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Fault raised by a single document-store or audit operation
///
/// Each variant corresponds to one [`FaultKind`]. For the two HTTP status
/// variants the carried `reason` is the status reason text exactly as it is
/// reported back to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreFault {
    /// Connection, DNS or transport failure before a usable response arrived
    #[error("Network failure: {0}")]
    Network(String),

    /// Store answered with a non-2xx status
    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Supplied revision is stale (409 on update/delete)
    #[error("Revision conflict: {reason}")]
    ConcurrencyConflict { reason: String },

    /// Payload could not be encoded as JSON
    #[error("Serialization failure: {0}")]
    Serialization(String),

    /// Audit file could not be opened or written
    #[error("I/O failure: {0}")]
    Io(String),

    /// Operation deadline elapsed
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Shutdown was signalled while the operation was in flight
    #[error("Operation cancelled")]
    Cancelled,
}

/// Category of a [`StoreFault`], carried on failure envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    Network,
    HttpStatus,
    ConcurrencyConflict,
    Serialization,
    Io,
    Timeout,
    Cancelled,
}

impl FaultKind {
    /// Whether a calling layer may retry an operation that failed this way
    ///
    /// Conflicts are never retryable: the caller must re-read the document
    /// and decide what to do with the newer revision.
    pub fn is_retryable(self) -> bool {
        matches!(self, FaultKind::Network | FaultKind::Timeout)
    }

    /// Stable lowercase name, used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            FaultKind::Network => "network",
            FaultKind::HttpStatus => "http_status",
            FaultKind::ConcurrencyConflict => "concurrency_conflict",
            FaultKind::Serialization => "serialization",
            FaultKind::Io => "io",
            FaultKind::Timeout => "timeout",
            FaultKind::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StoreFault {
    /// Category of this fault
    pub fn kind(&self) -> FaultKind {
        match self {
            StoreFault::Network(_) => FaultKind::Network,
            StoreFault::HttpStatus { .. } => FaultKind::HttpStatus,
            StoreFault::ConcurrencyConflict { .. } => FaultKind::ConcurrencyConflict,
            StoreFault::Serialization(_) => FaultKind::Serialization,
            StoreFault::Io(_) => FaultKind::Io,
            StoreFault::Timeout(_) => FaultKind::Timeout,
            StoreFault::Cancelled => FaultKind::Cancelled,
        }
    }

    /// Text placed in an envelope's `failureReason`
    ///
    /// Status failures report the bare reason text (`"Conflict"`,
    /// `"Not Found"`); every other fault reports its full diagnostic.
    pub fn failure_reason(&self) -> String {
        match self {
            StoreFault::HttpStatus { reason, .. } => reason.clone(),
            StoreFault::ConcurrencyConflict { reason } => reason.clone(),
            other => other.to_string(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PharmaError {
    fn from(err: std::io::Error) -> Self {
        PharmaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PharmaError {
    fn from(err: serde_json::Error) -> Self {
        PharmaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PharmaError {
    fn from(err: toml::de::Error) -> Self {
        PharmaError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<std::io::Error> for StoreFault {
    fn from(err: std::io::Error) -> Self {
        StoreFault::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreFault {
    fn from(err: serde_json::Error) -> Self {
        StoreFault::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pharma_error_display() {
        let err = PharmaError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_store_fault_conversion() {
        let fault = StoreFault::Network("connection refused".to_string());
        let err: PharmaError = fault.into();
        assert!(matches!(err, PharmaError::Store(StoreFault::Network(_))));
    }

    #[test]
    fn test_fault_kind_mapping() {
        let conflict = StoreFault::ConcurrencyConflict {
            reason: "Conflict".to_string(),
        };
        assert_eq!(conflict.kind(), FaultKind::ConcurrencyConflict);
        assert_eq!(StoreFault::Cancelled.kind(), FaultKind::Cancelled);
        assert_eq!(
            StoreFault::HttpStatus {
                status: 404,
                reason: "Not Found".to_string()
            }
            .kind(),
            FaultKind::HttpStatus
        );
    }

    #[test]
    fn test_failure_reason_uses_bare_status_text() {
        let fault = StoreFault::HttpStatus {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(fault.failure_reason(), "Not Found");

        let conflict = StoreFault::ConcurrencyConflict {
            reason: "Conflict".to_string(),
        };
        assert_eq!(conflict.failure_reason(), "Conflict");
    }

    #[test]
    fn test_failure_reason_keeps_diagnostic_for_transport_faults() {
        let fault = StoreFault::Network("dns error: no such host".to_string());
        assert_eq!(
            fault.failure_reason(),
            "Network failure: dns error: no such host"
        );
    }

    #[test]
    fn test_only_transport_faults_are_retryable() {
        assert!(FaultKind::Network.is_retryable());
        assert!(FaultKind::Timeout.is_retryable());
        assert!(!FaultKind::ConcurrencyConflict.is_retryable());
        assert!(!FaultKind::HttpStatus.is_retryable());
        assert!(!FaultKind::Io.is_retryable());
        assert!(!FaultKind::Cancelled.is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PharmaError = io_err.into();
        assert!(matches!(err, PharmaError::Io(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let fault: StoreFault = io_err.into();
        assert_eq!(fault.kind(), FaultKind::Io);
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PharmaError = json_err.into();
        assert!(matches!(err, PharmaError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PharmaError = toml_err.into();
        assert!(matches!(err, PharmaError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_fault_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FaultKind::ConcurrencyConflict).unwrap();
        assert_eq!(json, "\"concurrency_conflict\"");
    }
}
