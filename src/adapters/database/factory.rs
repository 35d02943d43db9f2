//! Repository factory
//!
//! This module picks the repository implementation based on configuration.

use crate::adapters::couchdb::{redact_url, CouchRepository};
use crate::adapters::database::memory::InMemoryRepository;
use crate::adapters::database::traits::DocumentRepository;
use crate::config::PharmaConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create a document repository based on the configuration
///
/// With `application.dry_run` set, documents are kept in process and
/// nothing is sent to CouchDB.
///
/// # Errors
///
/// Returns a configuration error if the CouchDB client factory cannot be
/// built from `[couchdb]`.
pub fn create_repository(config: &PharmaConfig) -> Result<Arc<dyn DocumentRepository>> {
    if config.application.dry_run {
        tracing::info!("Dry run enabled, using in-memory repository");
        return Ok(Arc::new(InMemoryRepository::new()));
    }

    let repository = CouchRepository::new(&config.couchdb)?;
    tracing::info!(
        url = %redact_url(&config.couchdb.url),
        database = %config.couchdb.database,
        "Creating CouchDB repository"
    );
    Ok(Arc::new(repository))
}
