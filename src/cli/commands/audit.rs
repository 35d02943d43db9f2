//! Audit command implementation
//!
//! Appends one encoded drug record to the audit file.

use super::{report, CommandOptions, EXIT_CONFIG};
use crate::audit::AuditWriter;
use crate::core::OperationContext;
use crate::domain::DrugDetails;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Default deadline for an audit append when no configuration is loaded
const DEFAULT_AUDIT_TIMEOUT_SECS: u64 = 30;

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Drug name
    #[arg(long)]
    pub name: String,

    /// Expiry, recorded verbatim
    #[arg(long)]
    pub expiry: String,

    /// Audit file (defaults to `audit.file_path` from the configuration)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl AuditArgs {
    /// Execute the audit command
    ///
    /// With `--file` the configuration file is not read at all.
    pub async fn execute(&self, options: &CommandOptions) -> anyhow::Result<i32> {
        let details = DrugDetails::new(&self.name, &self.expiry);

        let (path, ctx) = match &self.file {
            Some(path) => {
                let seconds = options.timeout_secs.unwrap_or(DEFAULT_AUDIT_TIMEOUT_SECS);
                let ctx = OperationContext::with_timeout(Duration::from_secs(seconds))
                    .shutdown(options.shutdown.clone());
                (path.clone(), ctx)
            }
            None => {
                let Some(config) = options.load() else {
                    return Ok(EXIT_CONFIG);
                };
                let writer = AuditWriter::new(&config.audit);
                (writer.file_path().to_path_buf(), options.context(&config))
            }
        };

        tracing::info!(path = %path.display(), "Appending audit record");
        let envelope = AuditWriter::append_to(&ctx, &path, &details).await;
        report(&envelope)
    }
}
