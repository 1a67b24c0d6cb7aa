//! In-memory storage backend

pub mod table;

pub use table::MemoryTable;
