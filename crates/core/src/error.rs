use slotkeeper_files::FilesError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Player file not found: {}", .0.display())]
    PlayerFileNotFound(PathBuf),
    #[error("Slot file not found: {}", .0.display())]
    SlotFileNotFound(PathBuf),

    #[error("Invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize JSON: {0}")]
    Serialization(serde_json::Error),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: FilesError },
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: FilesError },
    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: FilesError },

    #[error(transparent)]
    Files(#[from] FilesError),
}

pub type SaveResult<T> = std::result::Result<T, SaveError>;
