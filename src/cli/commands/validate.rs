//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the PharmaStore configuration file.

use super::{EXIT_CONFIG, EXIT_SUCCESS};
use crate::adapters::couchdb::{redact_url, ClientFactory};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates; the CouchDB client factory is also built
    /// so that URL and credential problems show up here rather than on the
    /// first request.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if !config.application.dry_run {
            if let Err(e) = ClientFactory::new(&config.couchdb) {
                println!("❌ CouchDB settings are unusable");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        }

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  CouchDB URL: {}", redact_url(&config.couchdb.url));
        println!("  CouchDB Database: {}", config.couchdb.database);
        println!("  CouchDB User: {}", config.couchdb.username);
        println!("  Auth Scheme: {:?}", config.couchdb.auth_scheme);
        println!("  Timeout: {}s", config.couchdb.timeout_seconds);
        println!("  TLS Verify: {}", config.couchdb.tls_verify);
        println!("  Audit File: {}", config.audit.file_path);
        println!();
        Ok(EXIT_SUCCESS)
    }
}
