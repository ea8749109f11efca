//! Constants used throughout the Slotkeeper core crate.
//!
//! This module contains all path, filename and document-key constants to ensure
//! consistency across the codebase and make maintenance easier.

/// Default directory for player files when no explicit directory is configured.
pub const DEFAULT_PLAYERS_DIR: &str = "saves/Players";

/// Default root directory for slot files when no explicit directory is configured.
pub const DEFAULT_SLOTS_DIR: &str = "saves/Slots";

/// Default directory receiving backups made before deletes.
pub const DEFAULT_BACKUP_DIR: &str = "saves/Backups";

/// Extension of player and slot files.
pub const JSON_EXTENSION: &str = "json";

/// Document key holding the slot identifier.
pub const SLOT_ID_KEY: &str = "slot_id";

/// Document key holding the game's save payload.
pub const DATAFILE_KEY: &str = "datafile";

/// Document key holding the creation time of a synthesised slot.
pub const CREATED_KEY: &str = "created";

/// `chrono` format of the `created` timestamp (local time).
pub const CREATED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
