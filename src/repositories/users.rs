//! User repository
//!
//! Read side of the authentication collaborator. Same failure policy as
//! the exam repository: log and report absence, never raise.

use crate::adapters::storage::{StorageTable, WriteCondition};
use crate::domain::record::{make_key, USER_KEY_PREFIX};
use crate::domain::{StorageError, User};
use std::sync::Arc;

/// Repository for [`User`] records, keyed by e-mail
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn StorageTable>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn StorageTable>) -> Self {
        Self { store }
    }

    /// Point lookup by the user's natural key
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let pk = make_key(USER_KEY_PREFIX, email);
        match self.store.get_item(&pk).await {
            Ok(Some(record)) => match User::from_record(record) {
                Ok(user) => Some(user),
                Err(error) => {
                    tracing::error!(email, %error, "Stored user record is malformed");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                tracing::error!(email, %error, "Failed to read user");
                None
            }
        }
    }

    /// Inserts a new user; an existing e-mail is a logged non-success
    pub async fn create(&self, user: &User) -> bool {
        match self
            .store
            .put_item(user.to_record(), WriteCondition::NotExists)
            .await
        {
            Ok(()) => true,
            Err(StorageError::ConditionFailed) => {
                tracing::warn!(email = %user.email, "User already exists, create skipped");
                false
            }
            Err(error) => {
                tracing::error!(email = %user.email, %error, "Failed to create user");
                false
            }
        }
    }
}
