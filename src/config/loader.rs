//! Configuration loader with TOML parsing and environment overrides

use super::schema::LaudoConfig;
use crate::domain::errors::LaudoError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`LaudoConfig`]
/// 4. Applies environment variable overrides (`LAUDO_*` prefix)
/// 5. Validates the configuration
pub fn load_config(path: impl AsRef<Path>) -> Result<LaudoConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LaudoError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LaudoError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: LaudoConfig = toml::from_str(&contents)
        .map_err(|e| LaudoError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| LaudoError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines keep their placeholders untouched; a referenced variable
/// that is not set fails the load.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid substitution pattern");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LaudoError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `LAUDO_*` prefix
///
/// Variables follow the pattern `LAUDO_<SECTION>_<KEY>`, for example
/// `LAUDO_SERVER_PORT` or `LAUDO_STORAGE_TABLE_NAME`.
fn apply_env_overrides(config: &mut LaudoConfig) {
    if let Ok(val) = std::env::var("LAUDO_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("LAUDO_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Ok(val) = std::env::var("LAUDO_SERVER_PORT") {
        if let Ok(port) = val.parse() {
            config.server.port = port;
        }
    }

    if let Ok(val) = std::env::var("LAUDO_AUTH_JWT_SECRET") {
        config.auth.jwt_secret = secrecy::Secret::new(val.into());
    }
    if let Ok(val) = std::env::var("LAUDO_AUTH_TOKEN_TTL_HOURS") {
        if let Ok(ttl) = val.parse() {
            config.auth.token_ttl_hours = ttl;
        }
    }

    if let Ok(val) = std::env::var("LAUDO_STORAGE_TABLE_NAME") {
        config.storage.table_name = val;
    }
    if let Ok(val) = std::env::var("LAUDO_STORAGE_BUCKET_NAME") {
        config.storage.bucket_name = val;
    }

    if let Ok(val) = std::env::var("LAUDO_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LAUDO_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
