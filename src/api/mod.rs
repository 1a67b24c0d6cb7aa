//! HTTP surface
//!
//! Thin axum layer over the workflows in [`crate::core`]: JSON bodies in
//! and out, bearer-token extraction, and the error-to-status mapping.
//! All business rules live below this layer.

pub mod routes;
pub mod schemas;

pub use routes::{build_router, AppState};
