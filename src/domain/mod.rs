//! Domain models and types for PharmaStore.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DocumentId`], [`Revision`])
//! - **Batch record models** ([`PharmaDetails`], [`UpdatePharmaDetails`], [`DrugDetails`])
//! - **The result envelope** ([`ResponseEnvelope`]) returned by every store call
//! - **Error types** ([`PharmaError`], [`StoreFault`], [`FaultKind`])
//! - **Result type alias** ([`Result`])
//!
//! # Envelopes
//!
//! Repository operations never return `Err`. Every outcome, including
//! transport failures and revision conflicts, is folded into an envelope:
//!
//! ```rust
//! use pharmastore::domain::{FaultKind, ResponseEnvelope, StoreFault};
//!
//! let conflict = ResponseEnvelope::failure(&StoreFault::ConcurrencyConflict {
//!     reason: "Conflict".to_string(),
//! });
//! assert_eq!(conflict.failure_reason(), Some("Conflict"));
//! assert_eq!(conflict.fault_kind(), Some(FaultKind::ConcurrencyConflict));
//! ```

pub mod envelope;
pub mod errors;
pub mod ids;
pub mod pharma;
pub mod result;

// Re-export commonly used types for convenience
pub use envelope::ResponseEnvelope;
pub use errors::{FaultKind, PharmaError, StoreFault};
pub use ids::{DocumentId, Revision};
pub use pharma::{DrugDetails, PharmaDetails, PharmaDetailsBuilder, UpdatePharmaDetails};
pub use result::Result;
