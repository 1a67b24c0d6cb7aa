//! Profile use case: token to the caller's own user record

use crate::auth::TokenVerifier;
use crate::domain::result::Result;
use crate::domain::User;
use crate::repositories::UserRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProfileWorkflow {
    users: UserRepository,
    tokens: Arc<dyn TokenVerifier>,
}

impl ProfileWorkflow {
    pub fn new(users: UserRepository, tokens: Arc<dyn TokenVerifier>) -> Self {
        Self { users, tokens }
    }

    /// Resolves the authenticated caller's user record
    pub async fn me(&self, token: Option<&str>) -> Result<User> {
        super::authenticate(&self.users, self.tokens.as_ref(), token).await
    }
}
