//! Configuration schema types

use crate::config::secret::{secret_string, SecretString};
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Root configuration, mapped from the TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct LaudoConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Token issuance settings
    pub auth: AuthConfig,

    /// Persistence collaborator names (table, blob bucket)
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LaudoConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.auth.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
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

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bind_address.trim().is_empty() {
            return Err("server.bind_address must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("server.port must be non-zero".to_string());
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Token issuance configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret; use `${LAUDO_JWT_SECRET}` in the TOML file
    #[serde(deserialize_with = "secret_string")]
    pub jwt_secret: SecretString,

    /// Access-token lifetime in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.expose_secret().is_empty() {
            return Err("auth.jwt_secret must not be empty".to_string());
        }
        if self.token_ttl_hours < 1 {
            return Err("auth.token_ttl_hours must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Persistence collaborator configuration
///
/// Provisioning of the table and bucket is owned by the infrastructure
/// side; the names are carried here so the adapters can be pointed at
/// them.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub table_name: String,
    pub bucket_name: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.table_name.trim().is_empty() {
            return Err("storage.table_name must not be empty".to_string());
        }
        if self.bucket_name.trim().is_empty() {
            return Err("storage.bucket_name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a rotating local file in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// One of: daily, hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be daily or hourly",
                self.local_rotation
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
