//! Save file services.
//!
//! `slots` handles player and slot files addressed by identifier; `files` handles arbitrary
//! paths for the generic file endpoints.

pub mod files;
pub mod slots;
