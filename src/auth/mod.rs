//! Authentication collaborators: token service and credential check

pub mod password;
pub mod token;

pub use password::verify_password;
pub use token::{JwtTokens, TokenVerifier};
