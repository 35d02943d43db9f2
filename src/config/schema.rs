//! Configuration schema types

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main PharmaStore configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PharmaConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Document store connection settings
    pub couchdb: CouchDbConfig,

    /// Audit trail settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PharmaConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.couchdb.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (use an in-memory store instead of CouchDB)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// How the `Authorization` header is derived from the credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// Standard Basic auth over `username:password`
    #[default]
    Basic,
    /// Basic auth over the username alone, for byte-compatibility with
    /// deployments that were provisioned that way
    UsernameOnly,
}

/// CouchDB connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchDbConfig {
    /// Base URL of the CouchDB server
    pub url: String,

    /// Database holding the batch records
    pub database: String,

    /// Username for Basic authentication
    pub username: String,

    /// Password for Basic authentication
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Authorization header scheme
    #[serde(default)]
    pub auth_scheme: AuthScheme,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Only disable against development servers with self-signed certificates.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl CouchDbConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.url.is_empty() {
            return Err("couchdb.url cannot be empty".to_string());
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err("couchdb.url must start with http:// or https://".to_string());
        }

        validate_database_name(&self.database)?;

        if self.username.trim().is_empty() {
            return Err("couchdb.username cannot be empty".to_string());
        }

        if self.auth_scheme == AuthScheme::Basic {
            let missing = self
                .password
                .as_ref()
                .map(|p| p.expose_secret().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(
                    "couchdb.password cannot be empty when auth_scheme is 'basic'".to_string(),
                );
            }
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(format!(
                "couchdb.timeout_seconds must be between 1 and 300, got {}",
                self.timeout_seconds
            ));
        }

        Ok(())
    }
}

impl Default for CouchDbConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5984".to_string(),
            database: default_database(),
            username: "admin".to_string(),
            password: None,
            auth_scheme: AuthScheme::default(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// CouchDB database names must start with a lowercase letter and contain
/// only lowercase letters, digits, and `_$()+-/`.
fn validate_database_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Err("couchdb.database cannot be empty".to_string()),
        Some(c) if !c.is_ascii_lowercase() => {
            return Err(format!(
                "couchdb.database '{name}' must start with a lowercase letter"
            ))
        }
        _ => {}
    }

    if let Some(bad) = chars.find(|c| {
        !(c.is_ascii_lowercase() || c.is_ascii_digit() || "_$()+-/".contains(*c))
    }) {
        return Err(format!(
            "couchdb.database '{name}' contains invalid character '{bad}'"
        ));
    }

    Ok(())
}

/// Audit trail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// File the encoded audit records are appended to
    #[serde(default = "default_audit_file")]
    pub file_path: String,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.file_path.trim().is_empty() {
            return Err("audit.file_path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            file_path: default_audit_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_database() -> String {
    "pharma".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_audit_file() -> String {
    "data/audit.txt".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
