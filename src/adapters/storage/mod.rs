//! Storage collaborator boundary

pub mod traits;

pub use traits::{StorageTable, WriteCondition};
