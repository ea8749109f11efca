//! Slotkeeper File Access
//!
//! This crate wraps the handful of filesystem calls that Slotkeeper performs on save files:
//! existence checks, bounded reads, overwrite writes, deletes with an optional backup copy,
//! removal of empty directories and metadata lookups.
//!
//! ## Design Principles
//!
//! - Every call performs fresh syscalls; nothing is cached between calls
//! - A missing target is reported as data (`false`, `deleted = false`) for checks and deletes,
//!   and as [`FilesError::NotFound`] for content reads
//! - Reads are bounded: size is checked from metadata before the file is opened
//! - Backups are best-effort and never block a delete
//!
//! ## Example Usage
//!
//! ```no_run
//! use slotkeeper_files::FilesService;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = FilesService::new("saves/Backups", 10 * 1024 * 1024);
//! let bytes = service.read_file(Path::new("saves/Players/123.json"))?;
//! service.write_file(Path::new("saves/Slots/123/slot1.json"), &bytes)?;
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;

pub use constants::{BACKUP_EXTENSION, BACKUP_TIMESTAMP_FORMAT, DEFAULT_MAX_READ_BYTES};
pub use files::{DeleteOutcome, FileInfo, FilesService};

use std::path::PathBuf;

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Target of a content read does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file operation was pointed at a directory
    #[error("Path points to a directory, not a file: {}", .0.display())]
    IsDirectory(PathBuf),

    /// A directory operation was pointed at something else
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// File is larger than the configured read limit
    #[error("File too large: {size} bytes (max {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    /// Directory still has entries
    #[error("Directory is not empty: {}", .0.display())]
    NotEmpty(PathBuf),

    /// Remove reported success but the path is still there
    #[error("File still exists after delete: {}", .0.display())]
    StillPresent(PathBuf),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for file operations.
pub type FilesResult<T> = Result<T, FilesError>;
