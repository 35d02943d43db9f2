//! Uniform result carrier for repository and audit operations

use super::errors::{FaultKind, StoreFault};
use serde::Serialize;

/// Outcome of one document-store or audit call
///
/// Only [`ResponseEnvelope::success`] and [`ResponseEnvelope::failure`] can
/// build one, so exactly one of `success_content` / `failure_reason` is ever
/// populated, and `fault_kind` is present exactly when the call failed.
///
/// # Examples
///
/// ```
/// use pharmastore::domain::ResponseEnvelope;
///
/// let ok = ResponseEnvelope::success(r#"{"ok":true}"#);
/// assert!(ok.is_success());
/// assert_eq!(ok.success_content(), Some(r#"{"ok":true}"#));
/// assert_eq!(ok.failure_reason(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    is_success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    success_content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    failure_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault_kind: Option<FaultKind>,
}

impl ResponseEnvelope {
    /// Successful outcome carrying the raw response body
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            is_success: true,
            success_content: content.into(),
            failure_reason: String::new(),
            fault_kind: None,
        }
    }

    /// Failed outcome built from a classified fault
    pub fn failure(fault: &StoreFault) -> Self {
        Self {
            is_success: false,
            success_content: String::new(),
            failure_reason: fault.failure_reason(),
            fault_kind: Some(fault.kind()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    /// Raw response body, `None` on failure
    pub fn success_content(&self) -> Option<&str> {
        self.is_success.then_some(self.success_content.as_str())
    }

    /// Diagnostic text, `None` on success
    pub fn failure_reason(&self) -> Option<&str> {
        (!self.is_success).then_some(self.failure_reason.as_str())
    }

    /// Fault category, `None` on success
    pub fn fault_kind(&self) -> Option<FaultKind> {
        self.fault_kind
    }

    /// Whether this failure was a stale-revision conflict
    pub fn is_conflict(&self) -> bool {
        self.fault_kind == Some(FaultKind::ConcurrencyConflict)
    }

    /// Parses the success body as JSON
    ///
    /// Returns `None` for failures and for bodies that are not valid JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        self.success_content()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

impl From<StoreFault> for ResponseEnvelope {
    fn from(fault: StoreFault) -> Self {
        Self::failure(&fault)
    }
}

impl From<Result<String, StoreFault>> for ResponseEnvelope {
    fn from(result: Result<String, StoreFault>) -> Self {
        match result {
            Ok(body) => Self::success(body),
            Err(fault) => Self::failure(&fault),
        }
    }
}
