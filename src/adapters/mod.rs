//! External integrations
//!
//! The persistence collaborator is consumed through the [`storage`] trait;
//! [`memory`] provides the in-process backend used for local runs and
//! tests. Production key-value stores plug in behind the same trait.

pub mod memory;
pub mod storage;
