//! Configuration management
//!
//! TOML-based configuration with `${VAR}` environment substitution,
//! `LAUDO_*` overrides and validation on load. Environment-derived
//! settings (signing secret, table and bucket names) live in one explicit
//! struct constructed at process start and passed into the collaborators,
//! never in a module-level global.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! bind_address = "0.0.0.0"
//! port = 8080
//!
//! [auth]
//! jwt_secret = "${LAUDO_JWT_SECRET}"
//! token_ttl_hours = 24
//!
//! [storage]
//! table_name = "laudo-exams"
//! bucket_name = "laudo-waveforms"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuthConfig, LaudoConfig, LoggingConfig, ServerConfig, StorageConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
