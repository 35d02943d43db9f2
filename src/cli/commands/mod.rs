//! CLI command implementations
//!
//! Document commands print the resulting envelope as JSON on stdout and map
//! it to an exit code:
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | success |
//! | 1 | operation failed (failure envelope) |
//! | 2 | configuration error |
//! | 3 | revision conflict |
//! | 4 | connection error or timeout |
//! | 5 | fatal error |

pub mod audit;
pub mod document;
pub mod init;
pub mod validate;

use crate::config::{load_config, PharmaConfig};
use crate::core::OperationContext;
use crate::domain::{FaultKind, ResponseEnvelope};
use std::time::Duration;
use tokio::sync::watch;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_CONFLICT: i32 = 3;
pub const EXIT_CONNECTION: i32 = 4;
pub const EXIT_FATAL: i32 = 5;

/// Settings shared by every command that talks to a store or file
#[derive(Debug, Clone)]
pub struct CommandOptions {
    /// Path to the configuration file
    pub config_path: String,

    /// Overrides `couchdb.timeout_seconds` as the operation deadline
    pub timeout_secs: Option<u64>,

    /// Forces the in-memory repository
    pub dry_run: bool,

    /// Flipped to `true` on Ctrl+C / SIGTERM
    pub shutdown: watch::Receiver<bool>,
}

impl CommandOptions {
    /// Loads configuration, reporting failures on stderr
    ///
    /// Returns `None` when the file cannot be loaded or is invalid; callers
    /// exit with [`EXIT_CONFIG`].
    pub fn load(&self) -> Option<PharmaConfig> {
        match load_config(&self.config_path) {
            Ok(mut config) => {
                if self.dry_run {
                    config.application.dry_run = true;
                }
                Some(config)
            }
            Err(e) => {
                tracing::error!(
                    config_path = %self.config_path,
                    error = %e,
                    "Failed to load configuration"
                );
                eprintln!("❌ Failed to load configuration file: {}", self.config_path);
                eprintln!("   Error: {e}");
                None
            }
        }
    }

    /// Deadline and shutdown signal for one operation
    pub fn context(&self, config: &PharmaConfig) -> OperationContext {
        let seconds = self.timeout_secs.unwrap_or(config.couchdb.timeout_seconds);
        OperationContext::with_timeout(Duration::from_secs(seconds))
            .shutdown(self.shutdown.clone())
    }
}

/// Prints the envelope as pretty JSON and returns the matching exit code
pub fn report(envelope: &ResponseEnvelope) -> anyhow::Result<i32> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(exit_code(envelope))
}

/// Exit code for an envelope
pub fn exit_code(envelope: &ResponseEnvelope) -> i32 {
    match envelope.fault_kind() {
        None => EXIT_SUCCESS,
        Some(FaultKind::ConcurrencyConflict) => EXIT_CONFLICT,
        Some(FaultKind::Network | FaultKind::Timeout) => EXIT_CONNECTION,
        Some(_) => EXIT_FAILURE,
    }
}
