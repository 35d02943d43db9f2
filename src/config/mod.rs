//! Configuration management for PharmaStore.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `PHARMA_*`
//! environment overrides, defaults for optional settings, and validation on
//! load. The loaded [`PharmaConfig`] is passed explicitly to the repository
//! and audit writer constructors; nothing reads configuration globally.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pharmastore::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pharmastore.toml")?;
//! println!("CouchDB: {}/{}", config.couchdb.url, config.couchdb.database);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [couchdb]
//! url = "http://localhost:5984"
//! database = "pharma"
//! username = "admin"
//! password = "${PHARMA_COUCHDB_PASSWORD}"
//!
//! [audit]
//! file_path = "data/audit.txt"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuditConfig, AuthScheme, CouchDbConfig, LoggingConfig, PharmaConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
