//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "pharmastore.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing PharmaStore configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your CouchDB address", self.output);
                println!("  2. Create a .env file with PHARMA_COUCHDB_PASSWORD set");
                println!("  3. Validate configuration: pharmastore validate-config");
                println!("  4. Store a batch: pharmastore create --name Aspirin");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Sample configuration with every option and its default
    fn generate_config() -> String {
        r#"# PharmaStore Configuration File
# CouchDB-backed batch records with a local audit trail

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (keep documents in memory, never contact CouchDB)
dry_run = false

# ============================================================================
# CouchDB
# ============================================================================
[couchdb]
url = "http://localhost:5984"

# Database name: lowercase letter first, then a-z 0-9 _$()+-/
database = "pharma"

username = "admin"
password = "${PHARMA_COUCHDB_PASSWORD}"

# basic         - Authorization: Basic base64(username:password)
# username_only - Authorization: Basic base64(username), for legacy proxies
auth_scheme = "basic"

# Per-request timeout (1-300)
timeout_seconds = 30

# Only disable against development servers with self-signed certificates
tls_verify = true

# ============================================================================
# Audit Trail
# ============================================================================
[audit]
file_path = "data/audit.txt"

# ============================================================================
# Logging
# ============================================================================
[logging]
local_enabled = false
local_path = "logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
