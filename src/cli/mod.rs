//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for PharmaStore using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// PharmaStore - pharmaceutical batch records in CouchDB
#[derive(Parser, Debug)]
#[command(name = "pharmastore")]
#[command(version, about, long_about = None)]
#[command(author = "PharmaStore Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "pharmastore.toml", env = "PHARMA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PHARMA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Operation deadline in seconds (defaults to couchdb.timeout_seconds)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Keep documents in memory instead of contacting CouchDB
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a new batch record
    Create(commands::document::CreateArgs),

    /// Fetch a batch record by id
    Get(commands::document::GetArgs),

    /// Change name and expiry of a batch record at a known revision
    Update(commands::document::UpdateArgs),

    /// Delete a batch record at a known revision
    Delete(commands::document::DeleteArgs),

    /// Append a drug record to the audit trail
    Audit(commands::audit::AuditArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_create() {
        let cli = Cli::parse_from([
            "pharmastore",
            "create",
            "--name",
            "Aspirin",
            "--expired-on",
            "2026-01-01",
        ]);
        assert_eq!(cli.config, "pharmastore.toml");
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.name, "Aspirin");
                assert_eq!(args.expired_on.unwrap().to_string(), "2026-01-01");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_update() {
        let cli = Cli::parse_from([
            "pharmastore",
            "update",
            "--id",
            "1",
            "--rev",
            "1-a",
            "--name",
            "Aspirin",
            "--expired-on",
            "2026-01-01",
        ]);
        match cli.command {
            Commands::Update(args) => {
                assert_eq!(args.id.as_str(), "1");
                assert_eq!(args.rev.as_str(), "1-a");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        let result = Cli::try_parse_from([
            "pharmastore",
            "update",
            "--id",
            "1",
            "--rev",
            "1-a",
            "--name",
            "Aspirin",
            "--expired-on",
            "next year",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_blank_id() {
        let result = Cli::try_parse_from(["pharmastore", "get", "--id", " "]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["pharmastore", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "pharmastore",
            "get",
            "--id",
            "1",
            "--timeout-secs",
            "5",
            "--dry-run",
        ]);
        assert_eq!(cli.timeout_secs, Some(5));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_parse_audit() {
        let cli = Cli::parse_from([
            "pharmastore",
            "audit",
            "--name",
            "Aspirin",
            "--expiry",
            "2025-01-01",
            "--file",
            "/tmp/audit.txt",
        ]);
        assert!(matches!(cli.command, Commands::Audit(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["pharmastore", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
