//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Save locations used to be fixed at build time; holding them here
//! lets the server, the CLI and the tests point the same services at different directories.

use crate::constants::{DEFAULT_BACKUP_DIR, DEFAULT_PLAYERS_DIR, DEFAULT_SLOTS_DIR, JSON_EXTENSION};
use crate::{SaveError, SaveResult};
use slotkeeper_files::DEFAULT_MAX_READ_BYTES;
use slotkeeper_types::{PlayerId, SlotId};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What a transfer does with a `slot_id` already present in the player file.
///
/// Restore always overwrites; this only governs transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotIdPolicy {
    /// Replace any existing `slot_id` with the target slot.
    #[default]
    Overwrite,
    /// Keep an existing `slot_id`; only insert one when missing.
    Preserve,
}

impl SlotIdPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotIdPolicy::Overwrite => "overwrite",
            SlotIdPolicy::Preserve => "preserve",
        }
    }
}

impl FromStr for SlotIdPolicy {
    type Err = SaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(SlotIdPolicy::Overwrite),
            "preserve" => Ok(SlotIdPolicy::Preserve),
            other => Err(SaveError::InvalidConfig(format!(
                "unknown slot id policy '{other}' (expected 'overwrite' or 'preserve')"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    players_dir: PathBuf,
    slots_dir: PathBuf,
    backup_dir: PathBuf,
    max_read_bytes: u64,
    slot_id_policy: SlotIdPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::InvalidConfig` if:
    /// - `max_read_bytes` is zero,
    /// - the players and slots directories are the same path.
    pub fn new(
        players_dir: PathBuf,
        slots_dir: PathBuf,
        backup_dir: PathBuf,
        max_read_bytes: u64,
        slot_id_policy: SlotIdPolicy,
    ) -> SaveResult<Self> {
        if max_read_bytes == 0 {
            return Err(SaveError::InvalidConfig(
                "max_read_bytes must be greater than zero".into(),
            ));
        }

        if players_dir == slots_dir {
            return Err(SaveError::InvalidConfig(format!(
                "players and slots directories must differ (both are {})",
                players_dir.display()
            )));
        }

        Ok(Self {
            players_dir,
            slots_dir,
            backup_dir,
            max_read_bytes,
            slot_id_policy,
        })
    }

    /// Resolve configuration from the process environment.
    ///
    /// Reads `PLAYERS_DIR`, `SLOTS_DIR`, `BACKUP_DIR`, `MAX_READ_BYTES` and `SLOT_ID_POLICY`;
    /// unset variables fall back to the defaults in [`crate::constants`].
    ///
    /// # Errors
    ///
    /// Returns `SaveError::InvalidConfig` if a variable cannot be parsed or the resulting
    /// configuration is rejected by [`CoreConfig::new`].
    pub fn from_env() -> SaveResult<Self> {
        let dir = |name: &str, default: &str| {
            PathBuf::from(std::env::var(name).unwrap_or_else(|_| default.into()))
        };

        Self::new(
            dir("PLAYERS_DIR", DEFAULT_PLAYERS_DIR),
            dir("SLOTS_DIR", DEFAULT_SLOTS_DIR),
            dir("BACKUP_DIR", DEFAULT_BACKUP_DIR),
            max_read_bytes_from_env_value(std::env::var("MAX_READ_BYTES").ok())?,
            slot_id_policy_from_env_value(std::env::var("SLOT_ID_POLICY").ok())?,
        )
    }

    pub fn players_dir(&self) -> &Path {
        &self.players_dir
    }

    pub fn slots_dir(&self) -> &Path {
        &self.slots_dir
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn max_read_bytes(&self) -> u64 {
        self.max_read_bytes
    }

    pub fn slot_id_policy(&self) -> SlotIdPolicy {
        self.slot_id_policy
    }

    /// `<players_dir>/<player>.json`
    pub fn player_file(&self, player: &PlayerId) -> PathBuf {
        self.players_dir.join(json_file_name(player.as_str()))
    }

    /// `<slots_dir>/<player>`
    pub fn slot_dir(&self, player: &PlayerId) -> PathBuf {
        self.slots_dir.join(player.as_str())
    }

    /// `<slots_dir>/<player>/<slot>.json`
    pub fn slot_file(&self, player: &PlayerId, slot: &SlotId) -> PathBuf {
        self.slot_dir(player).join(json_file_name(slot.as_str()))
    }
}

fn json_file_name(stem: &str) -> String {
    format!("{stem}.{JSON_EXTENSION}")
}

/// Derive the slot identifier from a slot file name.
///
/// A trailing `.json` is stripped; anything else is taken as the identifier itself, so
/// `slot1` and `slot1.json` both name slot `slot1`.
pub fn slot_id_from_file_name(file_name: &str) -> Result<SlotId, slotkeeper_types::TextError> {
    let suffix = format!(".{JSON_EXTENSION}");
    SlotId::parse(file_name.strip_suffix(&suffix).unwrap_or(file_name))
}

/// Parse the slot id policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default policy.
pub fn slot_id_policy_from_env_value(value: Option<String>) -> SaveResult<SlotIdPolicy> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<SlotIdPolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Parse the read limit (bytes) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the 10 MiB default.
pub fn max_read_bytes_from_env_value(value: Option<String>) -> SaveResult<u64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_MAX_READ_BYTES),
        Some(v) => v
            .parse::<u64>()
            .map_err(|e| SaveError::InvalidConfig(format!("invalid MAX_READ_BYTES '{v}': {e}"))),
    }
}
