//! In-memory storage table
//!
//! Implements [`StorageTable`] over a `HashMap` behind an async `RwLock`.
//! Condition checks and the write happen under one write-lock acquisition,
//! giving the same compare-and-swap semantics a production key-value store
//! provides through conditional expressions.

use crate::adapters::storage::{StorageTable, WriteCondition};
use crate::domain::record::Record;
use crate::domain::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process table keyed by the record's `PK` field
#[derive(Default)]
pub struct MemoryTable {
    items: RwLock<HashMap<String, Record>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records; test and diagnostics helper
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

fn primary_key(item: &Record) -> Result<String, StorageError> {
    item.get("PK")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| StorageError::Backend("record has no string PK field".to_string()))
}

#[async_trait]
impl StorageTable for MemoryTable {
    async fn get_item(&self, pk: &str) -> Result<Option<Record>, StorageError> {
        Ok(self.items.read().await.get(pk).cloned())
    }

    async fn put_item(
        &self,
        item: Record,
        condition: WriteCondition,
    ) -> Result<(), StorageError> {
        let pk = primary_key(&item)?;
        let mut items = self.items.write().await;

        match &condition {
            WriteCondition::None => {}
            WriteCondition::NotExists => {
                if items.contains_key(&pk) {
                    return Err(StorageError::ConditionFailed);
                }
            }
            WriteCondition::FieldEquals(field, expected) => {
                let stored = items
                    .get(&pk)
                    .ok_or_else(|| StorageError::ItemNotFound(pk.clone()))?;
                if stored.get(field) != Some(expected) {
                    return Err(StorageError::ConditionFailed);
                }
            }
        }

        items.insert(pk, item);
        Ok(())
    }

    async fn scan(&self, pk_prefix: &str) -> Result<Vec<Record>, StorageError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|(pk, _)| pk.starts_with(pk_prefix))
            .map(|(_, record)| record.clone())
            .collect())
    }
}
