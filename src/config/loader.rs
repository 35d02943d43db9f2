//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AuthScheme, PharmaConfig};
use super::secret_string;
use crate::domain::errors::PharmaError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PharmaConfig
/// 4. Applies environment variable overrides (PHARMA_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced variable is
/// unset, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use pharmastore::config::loader::load_config;
///
/// let config = load_config("pharmastore.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PharmaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PharmaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PharmaError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PharmaConfig = toml::from_str(&contents)
        .map_err(|e| PharmaError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config
        .validate()
        .map_err(|e| PharmaError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are passed through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PharmaError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PharmaError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using PHARMA_* prefix
///
/// Environment variables follow the pattern: PHARMA_<SECTION>_<KEY>
/// For example: PHARMA_COUCHDB_URL, PHARMA_AUDIT_FILE_PATH
fn apply_env_overrides(config: &mut PharmaConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("PHARMA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("PHARMA_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // CouchDB overrides
    if let Ok(val) = std::env::var("PHARMA_COUCHDB_URL") {
        config.couchdb.url = val;
    }
    if let Ok(val) = std::env::var("PHARMA_COUCHDB_DATABASE") {
        config.couchdb.database = val;
    }
    if let Ok(val) = std::env::var("PHARMA_COUCHDB_USERNAME") {
        config.couchdb.username = val;
    }
    if let Ok(val) = std::env::var("PHARMA_COUCHDB_PASSWORD") {
        config.couchdb.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("PHARMA_COUCHDB_AUTH_SCHEME") {
        config.couchdb.auth_scheme = match val.as_str() {
            "basic" => AuthScheme::Basic,
            "username_only" => AuthScheme::UsernameOnly,
            other => {
                return Err(PharmaError::Configuration(format!(
                    "Invalid PHARMA_COUCHDB_AUTH_SCHEME '{other}'. Must be one of: basic, username_only"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("PHARMA_COUCHDB_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.couchdb.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("PHARMA_COUCHDB_TLS_VERIFY") {
        config.couchdb.tls_verify = val.parse().unwrap_or(true);
    }

    // Audit overrides
    if let Ok(val) = std::env::var("PHARMA_AUDIT_FILE_PATH") {
        config.audit.file_path = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PHARMA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PHARMA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("PHARMA_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
