//! Login use case
//!
//! Credential check plus token issuance. Unknown e-mail and wrong
//! password are indistinguishable to the caller.

use crate::auth::{verify_password, JwtTokens};
use crate::domain::result::Result;
use crate::domain::LaudoError;
use crate::repositories::UserRepository;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct LoginWorkflow {
    users: UserRepository,
    tokens: Arc<JwtTokens>,
}

impl LoginWorkflow {
    pub fn new(users: UserRepository, tokens: Arc<JwtTokens>) -> Self {
        Self { users, tokens }
    }

    /// Returns an access token for valid credentials
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .ok_or(LaudoError::Forbidden)?;

        if !verify_password(password, &user.password) {
            tracing::warn!(email, "Login rejected");
            return Err(LaudoError::Forbidden);
        }

        self.tokens.issue(&user.email, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryTable;
    use crate::auth::TokenVerifier;
    use crate::domain::classification::UserRole;
    use crate::domain::User;
    use chrono::DateTime;

    async fn workflow() -> (LoginWorkflow, Arc<JwtTokens>) {
        let store = Arc::new(MemoryTable::new());
        let users = UserRepository::new(store);
        users
            .create(&User::new(
                "Dr. Login",
                "login@example.com",
                "s3cret",
                UserRole::Doctor,
                DateTime::from_timestamp(0, 0).unwrap(),
            ))
            .await;
        let tokens = Arc::new(JwtTokens::new("test-secret", 24));
        (LoginWorkflow::new(users, tokens.clone()), tokens)
    }

    #[tokio::test]
    async fn test_valid_credentials_issue_token() {
        let (workflow, tokens) = workflow().await;
        let token = workflow.login("login@example.com", "s3cret").await.unwrap();
        assert_eq!(tokens.verify(&token).as_deref(), Some("login@example.com"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_forbidden() {
        let (workflow, _) = workflow().await;
        let result = workflow.login("login@example.com", "wrong").await;
        assert!(matches!(result, Err(LaudoError::Forbidden)));
    }

    #[tokio::test]
    async fn test_unknown_email_is_forbidden() {
        let (workflow, _) = workflow().await;
        let result = workflow.login("ghost@example.com", "s3cret").await;
        assert!(matches!(result, Err(LaudoError::Forbidden)));
    }
}
