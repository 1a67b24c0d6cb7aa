//! Secure credential handling using the secrecy crate
//!
//! The JWT signing secret lives in memory behind `Secret<T>`: zeroed on
//! drop, redacted in Debug output, exposed only through an explicit
//! `expose_secret()` call.

use secrecy::{CloneableSecret, DebugSecret, Secret};
use serde::{Deserialize, Deserializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the traits `Secret` needs
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Type alias for a protected string credential
pub type SecretString = Secret<SecretValue>;

/// serde helper: deserialize a plain string into a [`SecretString`]
pub fn secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(Secret::new(SecretValue::from(value)))
}
