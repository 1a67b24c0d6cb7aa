//! Credential comparison
//!
//! Credential storage is owned by the provisioning side; here we only
//! compare the supplied secret against the stored one in constant time.

use subtle::ConstantTimeEq;

/// Constant-time equality check of a supplied credential
pub fn verify_password(supplied: &str, stored: &str) -> bool {
    let supplied = supplied.as_bytes();
    let stored = stored.as_bytes();
    if supplied.len() != stored.len() {
        return false;
    }
    supplied.ct_eq(stored).into()
}
