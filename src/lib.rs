// PharmaStore - CouchDB-backed pharmaceutical batch records
// Copyright (c) 2025 PharmaStore Contributors
// Licensed under the MIT License

//! # PharmaStore
//!
//! Stores pharmaceutical batch records in a CouchDB database over HTTP and
//! keeps a separate append-only audit trail of drug records on local disk.
//!
//! ## Overview
//!
//! - **Repository**: create, read, update and delete batch records, one HTTP
//!   request per call, with CouchDB revisions as the only concurrency control
//! - **Envelopes**: every outcome, success or failure, comes back as a
//!   [`domain::ResponseEnvelope`] carrying a classified fault
//! - **Audit trail**: base64 records appended to a file, serialized per path
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Operation deadlines and cancellation
//! - [`adapters`] - Repository trait, CouchDB and in-memory backends
//! - [`audit`] - Audit trail writer
//! - [`domain`] - Domain types, envelopes and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pharmastore::adapters::database::{create_repository, DocumentRepository};
//! use pharmastore::config::load_config;
//! use pharmastore::core::OperationContext;
//! use pharmastore::domain::PharmaDetails;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("pharmastore.toml")?;
//!     let repository = create_repository(&config)?;
//!
//!     let doc = PharmaDetails::builder().name("Aspirin").build()?;
//!     let ctx = OperationContext::with_timeout(Duration::from_secs(10));
//!     let envelope = repository.create_document(&ctx, &doc).await;
//!
//!     if envelope.is_success() {
//!         println!("stored: {}", envelope.success_content().unwrap_or_default());
//!     } else {
//!         eprintln!("failed: {}", envelope.failure_reason().unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Optimistic Concurrency
//!
//! Updates and deletes name the revision the caller last read. A stale
//! revision yields a failure envelope with [`domain::FaultKind::ConcurrencyConflict`];
//! nothing is retried and the stored document is unchanged.
//!
//! ```rust,no_run
//! use pharmastore::adapters::database::DocumentRepository;
//! use pharmastore::core::OperationContext;
//! use pharmastore::domain::{DocumentId, Revision, UpdatePharmaDetails};
//! use chrono::NaiveDate;
//!
//! # async fn example(repository: &dyn DocumentRepository) -> Result<(), Box<dyn std::error::Error>> {
//! let update = UpdatePharmaDetails::new(
//!     DocumentId::new("1")?,
//!     Revision::new("1-a")?,
//!     "Aspirin",
//!     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
//! );
//! let envelope = repository
//!     .update_document(&OperationContext::background(), &update)
//!     .await;
//! if envelope.is_conflict() {
//!     // re-read the document and decide what to do with the newer revision
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! PharmaStore uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(database = "pharma", "Repository ready");
//! warn!(fault_kind = "concurrency_conflict", "Document store call failed");
//! ```

pub mod adapters;
pub mod audit;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
