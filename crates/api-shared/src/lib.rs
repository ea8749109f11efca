//! # API Shared
//!
//! Shared utilities and definitions for Slotkeeper front ends.
//!
//! Contains:
//! - Request and response types for every endpoint (`models` module)
//! - Shared services like `HealthService`
//!
//! Used by `slotkeeper-core` (which produces the responses), `api-rest` and the CLI.

pub mod health;
pub mod models;

pub use health::HealthService;
pub use models::*;
