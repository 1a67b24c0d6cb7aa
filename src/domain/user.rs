//! User entity
//!
//! Users are owned by the authentication side; the workflows only ever
//! resolve them by e-mail and never write them back. Reports reference
//! their author by e-mail, the natural key, never by embedded value.

use crate::domain::classification::UserRole;
use crate::domain::record::{make_key, split_key, Record, Value, USER_KEY_PREFIX};
use crate::domain::result::Result;
use chrono::{DateTime, Utc};

/// An authenticated reviewer
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    /// Natural key; primary key is `USER#<email>`
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: UserRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
            created_at,
        }
    }

    /// Primary key of the persisted record
    pub fn key(&self) -> String {
        make_key(USER_KEY_PREFIX, &self.email)
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record
            .set("PK", self.key())
            .set("SK", Value::from_timestamp(self.created_at))
            .set("name", self.name.as_str())
            .set("email", self.email.as_str())
            .set("password", self.password.as_str())
            .set("role", self.role.label());
        record
    }

    pub fn from_record(record: Record) -> Result<Self> {
        let record = record.normalize();

        let email = record.require("email")?.as_str().ok_or_else(|| {
            crate::domain::errors::LaudoError::Validation("user email must be a string".into())
        })?;
        // The PK carries the same e-mail; validated for shape only.
        if let Some(pk) = record.optional("PK").and_then(Value::as_str) {
            split_key(pk, USER_KEY_PREFIX)?;
        }

        let created_at = record
            .require("SK")?
            .as_timestamp()
            .ok_or_else(|| validation("user SK must be epoch seconds"))?;

        // Records seeded before roles existed read back as plain doctors.
        let role = match record.optional("role").and_then(Value::as_str) {
            Some(label) => UserRole::parse(label)?,
            None => UserRole::Doctor,
        };

        Ok(Self {
            name: require_str(&record, "name")?,
            email: email.to_string(),
            password: require_str(&record, "password")?,
            role,
            created_at,
        })
    }
}

fn require_str(record: &Record, key: &str) -> Result<String> {
    record
        .require(key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| validation(&format!("user field '{key}' must be a string")))
}

fn validation(message: &str) -> crate::domain::errors::LaudoError {
    crate::domain::errors::LaudoError::Validation(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "Dra. Helena Souza",
            "helena@example.com",
            "s3cret",
            UserRole::DoctorManager,
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        )
    }

    #[test]
    fn test_record_round_trip() {
        let user = sample_user();
        let back = User::from_record(user.to_record()).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_key_uses_email() {
        assert_eq!(sample_user().key(), "USER#helena@example.com");
    }

    #[test]
    fn test_missing_role_defaults_to_doctor() {
        let mut record = sample_user().to_record();
        record.set("role", Value::Null);
        let user = User::from_record(record).unwrap();
        assert_eq!(user.role, UserRole::Doctor);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let mut record = sample_user().to_record();
        record.set("role", "nurse");
        assert!(User::from_record(record).is_err());
    }

    #[test]
    fn test_decimal_sk_is_normalized() {
        let mut record = sample_user().to_record();
        record.set("SK", Value::Decimal("1700000000".into()));
        let user = User::from_record(record).unwrap();
        assert_eq!(user.created_at.timestamp(), 1_700_000_000);
    }
}
