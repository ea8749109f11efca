//! Filesystem accessor implementation
//!
//! This module provides [`FilesService`], the only place in Slotkeeper that touches the
//! filesystem directly. Callers build absolute paths (player files, slot files, arbitrary
//! caller-supplied paths) and hand them in; the service performs the syscalls and maps the
//! outcome into [`FilesError`] or a small result struct.
//!
//! # Semantics
//!
//! - **Existence checks** distinguish "not found" (`Ok(false)`) from other stat failures (`Err`)
//! - **Reads** refuse directories; [`FilesService::read_file`] also refuses files above the
//!   configured limit before opening them
//! - **Writes** create parent directories, write a sibling temporary file and rename it over
//!   the target, so readers never observe a half-written document
//! - **Deletes** optionally copy the file into the backup directory first, then verify the path
//!   is gone
//!
//! # Backup Layout
//!
//! ```text
//! <backup_dir>/
//! ├── <file_name>_<YYYYmmdd_HHMMSS>.backup
//! └── <file_name>_<YYYYmmdd_HHMMSS>_<n>.backup   # same name, same second
//! ```

use crate::{FilesError, FilesResult, BACKUP_EXTENSION, BACKUP_TIMESTAMP_FORMAT};
use chrono::{DateTime, Local, Utc};
use slotkeeper_types::NonEmptyText;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result of [`FilesService::delete_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// `false` when there was nothing to delete
    pub deleted: bool,

    /// Location of the backup copy, if one was requested and succeeded
    pub backup_path: Option<PathBuf>,
}

/// Metadata snapshot returned by [`FilesService::file_info`].
#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
pub struct FileInfo {
    pub exists: bool,
    pub is_directory: bool,

    /// Size in bytes as reported by the filesystem (0 when missing)
    pub size: u64,

    /// Last modification time, when the platform reports one
    pub modified: Option<DateTime<Utc>>,

    /// Media type sniffed from the first bytes of a regular file.
    ///
    /// Best-effort only; `None` for directories, empty files and unrecognised content.
    pub media_type: Option<NonEmptyText>,
}

impl FileInfo {
    fn missing() -> Self {
        Self {
            exists: false,
            is_directory: false,
            size: 0,
            modified: None,
            media_type: None,
        }
    }
}

/// Service performing the filesystem calls behind every Slotkeeper operation
///
/// The service holds only configuration (backup location and read limit) and is cheap to
/// clone into request handlers.
#[derive(Debug, Clone)]
pub struct FilesService {
    /// Directory that receives backup copies before deletes
    backup_dir: PathBuf,

    /// Largest file `read_file` will return
    max_read_bytes: u64,
}

/// Attaches the operation and path to an I/O error, keeping its kind.
fn io_context(e: std::io::Error, action: &str, path: &Path) -> FilesError {
    FilesError::Io(std::io::Error::new(
        e.kind(),
        format!("Failed to {} {}: {}", action, path.display(), e),
    ))
}

impl FilesService {
    /// Creates a new `FilesService`
    ///
    /// # Arguments
    ///
    /// * `backup_dir` - Directory receiving backup copies; created lazily on first backup
    /// * `max_read_bytes` - Size limit enforced by [`Self::read_file`]
    pub fn new(backup_dir: impl Into<PathBuf>, max_read_bytes: u64) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            max_read_bytes,
        }
    }

    #[must_use]
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    #[must_use]
    pub fn max_read_bytes(&self) -> u64 {
        self.max_read_bytes
    }

    /// Reports whether `path` exists
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Io` if the stat fails for any reason other than "not found".
    pub fn exists(&self, path: &Path) -> FilesResult<bool> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_context(e, "check", path)),
        }
    }

    /// Reads a whole file into memory
    ///
    /// The size is taken from metadata first, so an oversized file is rejected without being
    /// opened.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path does not exist (`NotFound`)
    /// - the path is a directory (`IsDirectory`)
    /// - the file is larger than the configured limit (`TooLarge`)
    /// - the stat or read fails (`Io`)
    pub fn read_file(&self, path: &Path) -> FilesResult<Vec<u8>> {
        self.read_limited(path, Some(self.max_read_bytes))
    }

    /// Reads the whole file at `path` regardless of the read limit
    ///
    /// Used for save files addressed by identifier, which are moved between directories and
    /// must never be refused for size.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path does not exist (`NotFound`)
    /// - the path is a directory (`IsDirectory`)
    /// - the stat or read fails (`Io`)
    pub fn read_file_unbounded(&self, path: &Path) -> FilesResult<Vec<u8>> {
        self.read_limited(path, None)
    }

    fn read_limited(&self, path: &Path, limit: Option<u64>) -> FilesResult<Vec<u8>> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FilesError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(io_context(e, "check", path)),
        };

        if metadata.is_dir() {
            return Err(FilesError::IsDirectory(path.to_path_buf()));
        }

        if let Some(limit) = limit.filter(|&limit| metadata.len() > limit) {
            return Err(FilesError::TooLarge {
                size: metadata.len(),
                limit,
            });
        }

        fs::read(path).map_err(|e| io_context(e, "read", path))
    }

    /// Creates `path` and any missing parents
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Io` if creation fails, including when `path` exists as a file.
    pub fn ensure_dir(&self, path: &Path) -> FilesResult<()> {
        fs::create_dir_all(path).map_err(|e| io_context(e, "create directory", path))
    }

    /// Writes `bytes` to `path`, replacing any previous content
    ///
    /// Parent directories are created as needed. The data goes to a hidden sibling file that is
    /// then renamed over the target.
    ///
    /// # Returns
    ///
    /// Number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the target is an existing directory (`IsDirectory`)
    /// - directory creation, the write or the rename fails (`Io`)
    pub fn write_file(&self, path: &Path, bytes: &[u8]) -> FilesResult<u64> {
        if path.is_dir() {
            return Err(FilesError::IsDirectory(path.to_path_buf()));
        }

        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent).map_err(|e| io_context(e, "create directory", parent))?;
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| FilesError::IsDirectory(path.to_path_buf()))?;
        let mut tmp_name = std::ffi::OsString::from(".");
        tmp_name.push(file_name);
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, bytes).map_err(|e| io_context(e, "write", &tmp_path))?;

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_context(e, "replace", path));
        }

        Ok(bytes.len() as u64)
    }

    /// Deletes a file, optionally keeping a backup copy
    ///
    /// A missing file is not an error: the outcome reports `deleted = false`. A failed backup
    /// is logged and the delete proceeds without one.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path is a directory (`IsDirectory`)
    /// - the remove fails (`Io`)
    /// - the path still exists afterwards (`StillPresent`)
    pub fn delete_file(&self, path: &Path, with_backup: bool) -> FilesResult<DeleteOutcome> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(DeleteOutcome {
                    deleted: false,
                    backup_path: None,
                })
            }
            Err(e) => return Err(io_context(e, "check", path)),
        };

        if metadata.is_dir() {
            return Err(FilesError::IsDirectory(path.to_path_buf()));
        }

        let backup_path = if with_backup {
            match self.backup(path) {
                Ok(backup) => {
                    tracing::info!("Backed up {} to {}", path.display(), backup.display());
                    Some(backup)
                }
                Err(e) => {
                    tracing::warn!("Backup of {} failed, deleting anyway: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        fs::remove_file(path).map_err(|e| io_context(e, "delete", path))?;

        if self.exists(path)? {
            return Err(FilesError::StillPresent(path.to_path_buf()));
        }

        Ok(DeleteOutcome {
            deleted: true,
            backup_path,
        })
    }

    /// Removes a directory if it has no entries
    ///
    /// # Returns
    ///
    /// `Ok(true)` when the directory was removed, `Ok(false)` when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path is not a directory (`NotADirectory`)
    /// - the directory has at least one entry (`NotEmpty`)
    /// - listing or removal fails (`Io`)
    pub fn delete_empty_dir(&self, path: &Path) -> FilesResult<bool> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(io_context(e, "check", path)),
        };

        if !metadata.is_dir() {
            return Err(FilesError::NotADirectory(path.to_path_buf()));
        }

        let mut entries = fs::read_dir(path).map_err(|e| io_context(e, "list", path))?;
        if entries.next().is_some() {
            return Err(FilesError::NotEmpty(path.to_path_buf()));
        }

        fs::remove_dir(path).map_err(|e| io_context(e, "remove directory", path))?;
        Ok(true)
    }

    /// Collects metadata for `path`
    ///
    /// A missing path yields `exists = false` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Io` if the stat fails for any reason other than "not found".
    pub fn file_info(&self, path: &Path) -> FilesResult<FileInfo> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FileInfo::missing()),
            Err(e) => return Err(io_context(e, "check", path)),
        };

        let media_type = if metadata.is_file() {
            infer::get_from_path(path)
                .ok()
                .flatten()
                .and_then(|kind| NonEmptyText::new(kind.mime_type()).ok())
        } else {
            None
        };

        Ok(FileInfo {
            exists: true,
            is_directory: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            media_type,
        })
    }

    /// Copies `path` into the backup directory under a timestamped name.
    ///
    /// A name already taken within the same second gets a `_<n>` suffix, so an earlier backup
    /// is never overwritten.
    fn backup(&self, path: &Path) -> FilesResult<PathBuf> {
        let at = Local::now();

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| io_context(e, "create directory", &self.backup_dir))?;

        let mut attempt = 0;
        let (backup_path, mut target) = loop {
            let candidate = self.compute_backup_path(path, at, attempt)?;
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => break (candidate, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(io_context(e, "create", &candidate)),
            }
        };

        let mut source = fs::File::open(path).map_err(|e| io_context(e, "open", path))?;
        if let Err(e) = std::io::copy(&mut source, &mut target) {
            let _ = fs::remove_file(&backup_path);
            return Err(io_context(e, "copy", path));
        }

        Ok(backup_path)
    }

    /// Builds `<backup_dir>/<file_name>_<timestamp>.backup`, or
    /// `<file_name>_<timestamp>_<attempt>.backup` when `attempt` is non-zero.
    fn compute_backup_path(
        &self,
        path: &Path,
        at: DateTime<Local>,
        attempt: u32,
    ) -> FilesResult<PathBuf> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FilesError::NotFound(path.to_path_buf()))?;

        let stamp = at.format(BACKUP_TIMESTAMP_FORMAT);
        let name = if attempt == 0 {
            format!("{file_name}_{stamp}.{BACKUP_EXTENSION}")
        } else {
            format!("{file_name}_{stamp}_{attempt}.{BACKUP_EXTENSION}")
        };

        Ok(self.backup_dir.join(name))
    }
}
