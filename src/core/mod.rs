//! Use-case orchestration
//!
//! Each workflow runs as an independent, short-lived request handler; no
//! state is shared between invocations except the per-exam records in
//! storage. Isolation against concurrent reviewers comes from the
//! repository's guarded (compare-and-swap) writes, not in-process locks.

pub mod approval;
pub mod assignment;
pub mod login;
pub mod profile;

pub use approval::{ApprovalWorkflow, ApproveReportCommand};
pub use assignment::AssignmentWorkflow;
pub use login::LoginWorkflow;
pub use profile::ProfileWorkflow;

use crate::auth::TokenVerifier;
use crate::domain::result::Result;
use crate::domain::{LaudoError, User};
use crate::repositories::UserRepository;

/// Resolves the caller behind a bearer token
///
/// A missing, malformed or expired token and a valid token whose subject
/// no longer exists are treated identically: `Unauthorized`. The user
/// lookup is defense in depth against tokens signed for deleted accounts.
pub(crate) async fn authenticate(
    users: &UserRepository,
    tokens: &dyn TokenVerifier,
    token: Option<&str>,
) -> Result<User> {
    let token = token.ok_or(LaudoError::Unauthorized)?;
    let subject = tokens.verify(token).ok_or(LaudoError::Unauthorized)?;
    users
        .find_by_email(&subject)
        .await
        .ok_or(LaudoError::Unauthorized)
}
