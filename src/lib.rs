// Laudo - ECG exam review and report approval backend
// Copyright (c) 2026 Laudo Contributors
// Licensed under the MIT License

//! # Laudo - ECG exam review backend
//!
//! Laudo is the backend of a clinical ECG review workflow: exams arrive
//! from an ingestion pipeline, reviewing physicians pull the next exam
//! from a shared queue, write a diagnostic report, and approve one report
//! as the exam's official result.
//!
//! ## Architecture
//!
//! Laudo follows a layered architecture:
//!
//! - [`api`] - HTTP surface (axum handlers, wire schemas, status mapping)
//! - [`core`] - Workflows (login, profile, exam assignment, report approval)
//! - [`repositories`] - Entity-level access over the key-value store
//! - [`adapters`] - Storage backends behind the [`adapters::storage::StorageTable`] trait
//! - [`domain`] - Entities, diagnostic vocabularies, record codec, errors
//! - [`auth`] - Token issuance/verification and password checks
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Concurrency model
//!
//! Several reviewers work the same queue at once. Exclusivity is enforced
//! by conditional writes at the storage layer, not by in-process locks:
//! claiming an exam and approving a report are compare-and-swap updates,
//! and the assignment workflow retries with a fresh selection when it
//! loses a race.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use laudo::adapters::memory::MemoryTable;
//! use laudo::auth::JwtTokens;
//! use laudo::core::AssignmentWorkflow;
//! use laudo::repositories::{ExamRepository, UserRepository};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryTable::new());
//! let users = UserRepository::new(store.clone());
//! let exams = ExamRepository::new(store);
//! let tokens = Arc::new(JwtTokens::new("secret", 24));
//!
//! let assignment = AssignmentWorkflow::new(users, exams, tokens);
//! let next = assignment.next_exam(Some("<bearer token>")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::LaudoError`]; the HTTP layer
//! maps the taxonomy to status codes (401, 403, 422) and collapses
//! everything else into a generic 500.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod repositories;
