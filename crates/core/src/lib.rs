//! # Slotkeeper Core
//!
//! Core logic for managing game-server save files.
//!
//! This crate contains the data operations behind every endpoint:
//! - Resolving player and slot file paths from injected [`CoreConfig`]
//! - Moving saves between the active player file and stored slots
//! - Generic file read/write/stat/delete used by server tooling
//!
//! **No API concerns**: HTTP routing, parameter decoding and status codes belong in `api-rest`.
//! Services here return the response types from `api-shared` directly, so the REST layer and
//! the CLI render identical bodies.

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod repositories;

pub use api_shared as models;

pub use config::{CoreConfig, SlotIdPolicy};
pub use error::{SaveError, SaveResult};
pub use repositories::files::{FileContent, FileService};
pub use repositories::slots::{Deletion, SlotMove, SlotService};
