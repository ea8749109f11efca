//! Player and slot file operations.
//!
//! ## Storage layout
//!
//! ```text
//! <players_dir>/
//! └── <steamid>.json            # active save
//! <slots_dir>/
//! └── <steamid>/
//!     └── <slot_id>.json        # stored saves
//! ```
//!
//! Each public operation comes in two forms: a `try_*` method returning [`SaveResult`], and a
//! wrapper producing the wire response in which any error becomes `success = false` with the
//! error text.
//!
//! Save files are always read whole. The configured read limit only guards
//! [`crate::FileService::content`].

use crate::config::CoreConfig;
use crate::document::{self, default_slot, to_pretty};
use crate::models::{CheckRes, ContentRes, DeleteRes, EmptySlotRes, TransferRes, WriteSlotRes};
use crate::{SaveError, SaveResult};
use chrono::Local;
use serde_json::Value;
use slotkeeper_files::{FilesError, FilesService};
use slotkeeper_types::{PlayerId, SlotId};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Paths touched by a transfer or restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMove {
    pub player_file: PathBuf,
    pub slot_file: PathBuf,
}

/// Result of a delete through [`SlotService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub path: PathBuf,
    pub deleted: bool,
    pub backup_path: Option<PathBuf>,
}

/// Service for player and slot files
#[derive(Clone, Debug)]
pub struct SlotService {
    cfg: Arc<CoreConfig>,
    files: FilesService,
}

impl SlotService {
    /// Creates a new `SlotService` using the directories in `cfg`.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let files = FilesService::new(cfg.backup_dir(), cfg.max_read_bytes());
        Self { cfg, files }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Reports whether the player has an active save.
    ///
    /// A missing file is `exists = false` with no error; the resolved path is always returned.
    pub fn check(&self, player: &PlayerId) -> CheckRes {
        let path = self.cfg.player_file(player);
        let file_path = display(&path);

        match self.files.exists(&path) {
            Ok(exists) => {
                tracing::info!("Player file {} exists: {}", file_path, exists);
                CheckRes {
                    exists,
                    file_path,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!("Error checking player file {}: {}", file_path, e);
                CheckRes {
                    exists: false,
                    file_path,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Reads and parses the player's active save.
    ///
    /// # Errors
    ///
    /// Returns `SaveError` if:
    /// - the file does not exist (`PlayerFileNotFound`),
    /// - it cannot be read (`Read`),
    /// - it is not valid JSON (`InvalidJson`).
    pub fn try_player_file(&self, player: &PlayerId) -> SaveResult<Value> {
        let path = self.cfg.player_file(player);
        self.read_json(&path, SaveError::PlayerFileNotFound)
    }

    pub fn player_file(&self, player: &PlayerId) -> ContentRes {
        content_res(self.try_player_file(player))
    }

    /// Reads and parses one slot file.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_player_file`], with `SlotFileNotFound` for a missing slot.
    pub fn try_slot_file(&self, player: &PlayerId, slot: &SlotId) -> SaveResult<Value> {
        let path = self.cfg.slot_file(player, slot);
        self.read_json(&path, SaveError::SlotFileNotFound)
    }

    pub fn slot_file(&self, player: &PlayerId, slot: &SlotId) -> ContentRes {
        content_res(self.try_slot_file(player, slot))
    }

    /// Moves the player's active save into `slot`.
    ///
    /// The player file is normalised (see [`document::normalise_for_slot`]) and written to the
    /// slot path, then the player file is removed. Failure to remove it is logged only.
    ///
    /// # Errors
    ///
    /// Returns `SaveError` if:
    /// - the player file does not exist (`PlayerFileNotFound`),
    /// - reading it fails (`Read`),
    /// - the slot directory cannot be created (`CreateDir`),
    /// - the slot file cannot be written (`Write`).
    pub fn try_transfer(&self, player: &PlayerId, slot: &SlotId) -> SaveResult<SlotMove> {
        let player_file = self.cfg.player_file(player);
        let slot_dir = self.cfg.slot_dir(player);
        let slot_file = self.cfg.slot_file(player, slot);

        if !self.files.exists(&player_file)? {
            return Err(SaveError::PlayerFileNotFound(player_file));
        }

        let content = self
            .files
            .read_file_unbounded(&player_file)
            .map_err(|source| SaveError::Read {
                path: player_file.clone(),
                source,
            })?;

        let normalised =
            document::normalise_for_slot(&content, slot, self.cfg.slot_id_policy())?;

        self.files
            .ensure_dir(&slot_dir)
            .map_err(|source| SaveError::CreateDir {
                path: slot_dir.clone(),
                source,
            })?;
        self.write(&slot_file, &normalised)?;

        if let Err(e) = self.files.delete_file(&player_file, false) {
            tracing::warn!(
                "Failed to delete player file {} after transfer: {}",
                player_file.display(),
                e
            );
        }

        tracing::info!(
            "Slot {} transferred from {} to {}",
            slot,
            player_file.display(),
            slot_file.display()
        );

        Ok(SlotMove {
            player_file,
            slot_file,
        })
    }

    pub fn transfer(&self, player: &PlayerId, slot: &SlotId) -> TransferRes {
        match self.try_transfer(player, slot) {
            Ok(moved) => TransferRes {
                success: true,
                message: format!("Slot {} successfully transferred", slot),
                player_file: display(&moved.player_file),
                slot_file: display(&moved.slot_file),
                error: None,
            },
            Err(e) => {
                tracing::error!("Transfer of slot {} for {} failed: {}", slot, player, e);
                TransferRes::failure(e)
            }
        }
    }

    /// Writes `{"slot_id": <slot>, "datafile": null}` to the slot path, replacing any content.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Write` if the slot file cannot be written.
    pub fn try_empty_slot(&self, player: &PlayerId, slot: &SlotId) -> SaveResult<PathBuf> {
        let slot_file = self.cfg.slot_file(player, slot);
        self.write(&slot_file, &to_pretty(&default_slot(slot, None))?)?;

        tracing::info!("Empty slot {} created at {}", slot, slot_file.display());
        Ok(slot_file)
    }

    pub fn empty_slot(&self, player: &PlayerId, slot: &SlotId) -> EmptySlotRes {
        match self.try_empty_slot(player, slot) {
            Ok(slot_file) => EmptySlotRes {
                success: true,
                message: format!("Empty slot {} created successfully", slot),
                slot_file: display(&slot_file),
                error: None,
            },
            Err(e) => {
                tracing::error!("Creating empty slot {} for {} failed: {}", slot, player, e);
                EmptySlotRes::failure(e)
            }
        }
    }

    /// Copies `slot` back over the player's active save.
    ///
    /// A missing slot is first synthesised as an empty slot with a `created` timestamp. Data
    /// comes from the slot file only; the previous player file is overwritten, never merged.
    /// `slot_id` is always set to `slot`.
    ///
    /// # Errors
    ///
    /// Returns `SaveError` if:
    /// - either directory cannot be created (`CreateDir`),
    /// - the slot file cannot be read (`Read`) or is not a JSON object (`InvalidJson`),
    /// - a file cannot be written (`Write`).
    pub fn try_restore(&self, player: &PlayerId, slot: &SlotId) -> SaveResult<SlotMove> {
        let player_file = self.cfg.player_file(player);
        let slot_file = self.cfg.slot_file(player, slot);

        for dir in [self.cfg.slot_dir(player), self.cfg.players_dir().to_path_buf()] {
            self.files
                .ensure_dir(&dir)
                .map_err(|source| SaveError::CreateDir { path: dir, source })?;
        }

        if !self.files.exists(&slot_file)? {
            let empty = to_pretty(&default_slot(slot, Some(Local::now())))?;
            self.write(&slot_file, &empty)?;
            tracing::info!("Created empty slot {}", slot_file.display());
        }

        let content = self
            .files
            .read_file_unbounded(&slot_file)
            .map_err(|source| SaveError::Read {
                path: slot_file.clone(),
                source,
            })?;

        let doc = document::restamp(&content, slot).map_err(|source| SaveError::InvalidJson {
            path: slot_file.clone(),
            source,
        })?;

        self.write(&player_file, &to_pretty(&doc)?)?;

        tracing::info!(
            "Slot restored from {} to {}",
            slot_file.display(),
            player_file.display()
        );

        Ok(SlotMove {
            player_file,
            slot_file,
        })
    }

    pub fn restore(&self, player: &PlayerId, slot: &SlotId) -> TransferRes {
        match self.try_restore(player, slot) {
            Ok(moved) => TransferRes {
                success: true,
                message: format!("Slot {} successfully restored to player file", slot),
                player_file: display(&moved.player_file),
                slot_file: display(&moved.slot_file),
                error: None,
            },
            Err(e) => {
                tracing::error!("Restore of slot {} for {} failed: {}", slot, player, e);
                TransferRes::failure(e)
            }
        }
    }

    /// Writes caller-supplied data to a slot file.
    ///
    /// Blank data (see [`document::is_blank`]) is replaced by the default slot document with a
    /// `created` timestamp. Other data is re-indented and stored as given; `slot_id` is not
    /// patched.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Write` if the slot file cannot be written.
    pub fn try_write_slot(
        &self,
        player: &PlayerId,
        slot: &SlotId,
        data: Option<&Value>,
    ) -> SaveResult<PathBuf> {
        let slot_file = self.cfg.slot_file(player, slot);

        let bytes = match data {
            Some(value) if !document::is_blank(data) => {
                tracing::info!("Using provided data for slot {}", slot);
                to_pretty(value)?
            }
            _ => {
                tracing::info!("Using default data structure for slot {}", slot);
                to_pretty(&default_slot(slot, Some(Local::now())))?
            }
        };

        self.write(&slot_file, &bytes)?;
        tracing::info!("Data written to slot file {}", slot_file.display());
        Ok(slot_file)
    }

    pub fn write_slot(&self, player: &PlayerId, slot: &SlotId, data: Option<&Value>) -> WriteSlotRes {
        match self.try_write_slot(player, slot, data) {
            Ok(slot_file) => WriteSlotRes {
                success: true,
                message: format!("Data successfully written to {}", file_name(&slot_file)),
                file_path: Some(display(&slot_file)),
                error: None,
            },
            Err(e) => {
                tracing::error!("Writing slot {} for {} failed: {}", slot, player, e);
                WriteSlotRes::failure(e)
            }
        }
    }

    /// Deletes the player's active save, optionally backing it up first.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Files` if the delete fails. A missing file is not an error.
    pub fn try_delete_player_file(&self, player: &PlayerId, backup: bool) -> SaveResult<Deletion> {
        let path = self.cfg.player_file(player);
        self.delete(path, backup)
    }

    pub fn delete_player_file(&self, player: &PlayerId, backup: bool) -> DeleteRes {
        delete_res(self.try_delete_player_file(player, backup))
    }

    /// Deletes one slot file, optionally backing it up first.
    ///
    /// When this leaves the player's slot directory empty, the directory is removed as well
    /// (best-effort).
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Files` if the delete fails. A missing file is not an error.
    pub fn try_delete_slot_file(
        &self,
        player: &PlayerId,
        slot: &SlotId,
        backup: bool,
    ) -> SaveResult<Deletion> {
        let deletion = self.delete(self.cfg.slot_file(player, slot), backup)?;

        if deletion.deleted {
            let slot_dir = self.cfg.slot_dir(player);
            match self.files.delete_empty_dir(&slot_dir) {
                Ok(true) => tracing::info!("Removed empty slot directory {}", slot_dir.display()),
                Ok(false) | Err(FilesError::NotEmpty(_)) => {}
                Err(e) => tracing::warn!(
                    "Failed to remove slot directory {}: {}",
                    slot_dir.display(),
                    e
                ),
            }
        }

        Ok(deletion)
    }

    pub fn delete_slot_file(&self, player: &PlayerId, slot: &SlotId, backup: bool) -> DeleteRes {
        delete_res(self.try_delete_slot_file(player, slot, backup))
    }

    fn delete(&self, path: PathBuf, backup: bool) -> SaveResult<Deletion> {
        let outcome = self.files.delete_file(&path, backup)?;
        tracing::info!("Delete {} (deleted: {})", path.display(), outcome.deleted);

        Ok(Deletion {
            path,
            deleted: outcome.deleted,
            backup_path: outcome.backup_path,
        })
    }

    fn read_json(
        &self,
        path: &Path,
        not_found: impl FnOnce(PathBuf) -> SaveError,
    ) -> SaveResult<Value> {
        let content = self.files.read_file_unbounded(path).map_err(|source| match source {
            FilesError::NotFound(p) => not_found(p),
            source => SaveError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let value = serde_json::from_slice(&content).map_err(|source| SaveError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Read {} ({} bytes)", path.display(), content.len());
        Ok(value)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> SaveResult<u64> {
        self.files
            .write_file(path, bytes)
            .map_err(|source| SaveError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn content_res(result: SaveResult<Value>) -> ContentRes {
    match result {
        Ok(content) => ContentRes {
            success: true,
            content: Some(content),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Content read failed: {}", e);
            ContentRes::failure(e)
        }
    }
}

pub(crate) fn delete_res(result: SaveResult<Deletion>) -> DeleteRes {
    match result {
        Ok(deletion) => {
            let name = file_name(&deletion.path);
            DeleteRes {
                success: true,
                message: if deletion.deleted {
                    format!("{} successfully deleted", name)
                } else {
                    format!("{} does not exist, nothing to delete", name)
                },
                deleted: deletion.deleted,
                backup_path: deletion.backup_path.as_deref().map(display),
                error: None,
            }
        }
        Err(e) => {
            tracing::error!("Delete failed: {}", e);
            DeleteRes::failure(e)
        }
    }
}
