//! External system integrations for PharmaStore.
//!
//! - [`database`] - Repository trait, in-memory backend and factory
//! - [`couchdb`] - CouchDB implementation over HTTP
//!
//! # Design Pattern
//!
//! Adapters isolate the document store behind [`database::DocumentRepository`]
//! so callers and tests can swap the HTTP backend for the in-memory one.
//!
//! ```rust,no_run
//! use pharmastore::adapters::database::{create_repository, DocumentRepository};
//! use pharmastore::config::load_config;
//! use pharmastore::core::OperationContext;
//! use pharmastore::domain::DocumentId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pharmastore.toml")?;
//! let repository = create_repository(&config)?;
//!
//! let envelope = repository
//!     .get_document(&OperationContext::background(), &DocumentId::new("1")?)
//!     .await;
//! println!("success: {}", envelope.is_success());
//! # Ok(())
//! # }
//! ```

pub mod couchdb;
pub mod database;
