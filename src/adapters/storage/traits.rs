//! Storage abstraction trait
//!
//! The repository layer talks to the persistent key-value store through
//! this trait: point get, conditional put/replace, and a filtered scan.
//! Records are keyed by `PK` (entity-type prefix + identifier). Conditional
//! writes are the isolation mechanism for the review workflow: workers may
//! be distributed, so per-record compare-and-swap at the store, not an
//! in-process lock, is what prevents duplicate assignment.

use crate::domain::record::{Record, Value};
use crate::domain::StorageError;
use async_trait::async_trait;

/// Condition attached to a write
#[derive(Debug, Clone, PartialEq)]
pub enum WriteCondition {
    /// Unconditional write, last writer wins
    None,

    /// Insert only; fails with [`StorageError::ConditionFailed`] when the
    /// primary key already exists
    NotExists,

    /// Replace only while the stored record still carries the given field
    /// value; fails with [`StorageError::ConditionFailed`] otherwise
    FieldEquals(String, Value),
}

impl WriteCondition {
    /// Convenience constructor for boolean-field guards
    pub fn field_is(name: impl Into<String>, value: bool) -> Self {
        WriteCondition::FieldEquals(name.into(), Value::Bool(value))
    }
}

/// Persistent key-value table holding exam and user records
#[async_trait]
pub trait StorageTable: Send + Sync {
    /// Point lookup by primary key; absence is not an error
    async fn get_item(&self, pk: &str) -> Result<Option<Record>, StorageError>;

    /// Writes a record under its `PK` field, honoring the condition
    ///
    /// The condition check and the write must be atomic with respect to
    /// concurrent writers of the same key.
    async fn put_item(&self, item: Record, condition: WriteCondition)
        -> Result<(), StorageError>;

    /// Full scan of records whose primary key starts with `pk_prefix`
    async fn scan(&self, pk_prefix: &str) -> Result<Vec<Record>, StorageError>;
}
