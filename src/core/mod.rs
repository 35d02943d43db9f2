//! Core runtime plumbing shared by the repository and the audit writer.
//!
//! - [`context`] - Per-call deadline and shutdown propagation
//!
//! # Example
//!
//! ```rust
//! use pharmastore::core::OperationContext;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let ctx = OperationContext::with_timeout(Duration::from_secs(10)).shutdown(shutdown_rx);
//! assert!(!ctx.is_cancelled());
//! # }
//! ```

pub mod context;

pub use context::OperationContext;
