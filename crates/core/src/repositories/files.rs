//! Operations on arbitrary file paths.
//!
//! These back the generic file endpoints used by server tooling. Paths are taken as given
//! (relative paths resolve against the working directory).

use crate::config::CoreConfig;
use crate::document::to_pretty;
use crate::models::{DeleteRes, FileContentRes, FileInfoRes, WriteFileRes};
use crate::repositories::slots::{delete_res, file_name, Deletion};
use crate::{SaveError, SaveResult};
use serde_json::Value;
use slotkeeper_files::FilesService;
use std::path::Path;
use std::sync::Arc;

/// Text content of a file together with its size on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub content: String,
    pub size: u64,
}

/// Service for generic file access
#[derive(Clone, Debug)]
pub struct FileService {
    files: FilesService,
}

impl FileService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            files: FilesService::new(cfg.backup_dir(), cfg.max_read_bytes()),
        }
    }

    /// Reads a file as text.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Read` if the file is missing, is a directory, exceeds the read
    /// limit or cannot be read.
    pub fn try_content(&self, path: &Path) -> SaveResult<FileContent> {
        let bytes = self.files.read_file(path).map_err(|source| SaveError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(FileContent {
            size: bytes.len() as u64,
            content: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    pub fn content(&self, path: &Path) -> FileContentRes {
        match self.try_content(path) {
            Ok(file) => FileContentRes {
                success: true,
                content: Some(file.content),
                size: Some(file.size),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Reading {} failed: {}", path.display(), e);
                FileContentRes::failure(e)
            }
        }
    }

    /// Writes `data` to `path`, creating parent directories.
    ///
    /// The value is written as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Write` if the file cannot be written.
    pub fn try_write(&self, path: &Path, data: &Value) -> SaveResult<u64> {
        let bytes = to_pretty(data)?;
        let size = self
            .files
            .write_file(path, &bytes)
            .map_err(|source| SaveError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!("Wrote {} bytes to {}", size, path.display());
        Ok(size)
    }

    pub fn write(&self, path: &Path, data: &Value) -> WriteFileRes {
        match self.try_write(path, data) {
            Ok(size) => WriteFileRes {
                success: true,
                message: format!("File {} successfully written", file_name(path)),
                file_path: Some(path.display().to_string()),
                size: Some(size),
                error: None,
            },
            Err(e) => {
                tracing::error!("Writing {} failed: {}", path.display(), e);
                WriteFileRes::failure(e)
            }
        }
    }

    /// Stats `path`. A missing path is reported with `exists = false`, not as an error.
    pub fn info(&self, path: &Path) -> FileInfoRes {
        match self.files.file_info(path) {
            Ok(info) => FileInfoRes {
                success: true,
                exists: info.exists,
                is_directory: info.is_directory,
                size: info.size,
                mod_time: info.modified.map(|t| t.to_rfc3339()),
                media_type: info.media_type.map(|m| m.to_string()),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Stat of {} failed: {}", path.display(), e);
                FileInfoRes::failure(e)
            }
        }
    }

    /// Deletes a file (optionally backing it up) or an empty directory.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Files` if the path is a non-empty directory or the delete fails.
    /// A missing path is not an error.
    pub fn try_delete(&self, path: &Path, backup: bool) -> SaveResult<Deletion> {
        let deletion = if path.is_dir() {
            Deletion {
                path: path.to_path_buf(),
                deleted: self.files.delete_empty_dir(path)?,
                backup_path: None,
            }
        } else {
            let outcome = self.files.delete_file(path, backup)?;
            Deletion {
                path: path.to_path_buf(),
                deleted: outcome.deleted,
                backup_path: outcome.backup_path,
            }
        };

        tracing::info!("Delete {} (deleted: {})", path.display(), deletion.deleted);
        Ok(deletion)
    }

    pub fn delete(&self, path: &Path, backup: bool) -> DeleteRes {
        delete_res(self.try_delete(path, backup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlotIdPolicy;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn service(temp: &TempDir, max_read_bytes: u64) -> FileService {
        let cfg = CoreConfig::new(
            temp.path().join("Players"),
            temp.path().join("Slots"),
            temp.path().join("Backups"),
            max_read_bytes,
            SlotIdPolicy::Overwrite,
        )
        .unwrap();
        FileService::new(Arc::new(cfg))
    }

    #[test]
    fn content_returns_text_and_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let res = service(&temp, 1024).content(&path);

        assert!(res.success);
        assert_eq!(res.content.as_deref(), Some("hello"));
        assert_eq!(res.size, Some(5));
    }

    #[test]
    fn content_over_limit_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big.bin");
        fs::write(&path, vec![b'x'; 64]).unwrap();

        let res = service(&temp, 32).content(&path);

        assert!(!res.success);
        assert!(res.content.is_none());
        assert!(res.error.unwrap().contains("File too large: 64 bytes"));
    }

    #[test]
    fn content_missing_file_fails() {
        let temp = TempDir::new().unwrap();

        let res = service(&temp, 1024).content(&temp.path().join("nope"));

        assert!(!res.success);
        assert!(res.error.is_some());
    }

    #[test]
    fn write_pretty_prints_json_and_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("cfg.json");

        let res = service(&temp, 1024).write(&path, &json!({"k": [1, 2]}));

        assert!(res.success);
        assert_eq!(res.message, "File cfg.json successfully written");
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(res.size, Some(text.len() as u64));
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"k": [1, 2]})
        );
        assert!(text.starts_with("{\n  \"k\""));
    }

    #[test]
    fn write_over_directory_fails() {
        let temp = TempDir::new().unwrap();

        let res = service(&temp, 1024).write(temp.path(), &json!({"a": 1}));

        assert!(!res.success);
        assert!(res.file_path.is_none());
    }

    #[test]
    fn info_reports_missing_and_existing() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp, 1024);
        let path = temp.path().join("f.json");

        let missing = service.info(&path);
        assert!(missing.success);
        assert!(!missing.exists);
        assert!(missing.mod_time.is_none());

        fs::write(&path, "{}").unwrap();
        let present = service.info(&path);
        assert!(present.exists);
        assert!(!present.is_directory);
        assert_eq!(present.size, 2);
        assert!(present.mod_time.is_some());

        let dir = service.info(temp.path());
        assert!(dir.is_directory);
    }

    #[test]
    fn delete_missing_path_is_not_an_error() {
        let temp = TempDir::new().unwrap();

        let res = service(&temp, 1024).delete(&temp.path().join("gone.json"), false);

        assert!(res.success);
        assert!(!res.deleted);
    }

    #[test]
    fn delete_directory_only_when_empty() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp, 1024);
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("x"), "1").unwrap();

        let res = service.delete(&dir, false);
        assert!(!res.success);
        assert!(res.error.unwrap().contains("not empty"));
        assert!(dir.exists());

        fs::remove_file(dir.join("x")).unwrap();
        let res = service.delete(&dir, false);
        assert!(res.success);
        assert!(res.deleted);
        assert!(!dir.exists());
    }

    #[test]
    fn delete_file_with_backup_keeps_copy() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("save.json");
        fs::write(&path, "{\"a\":1}").unwrap();

        let deletion = service(&temp, 1024).try_delete(&path, true).unwrap();

        assert!(deletion.deleted);
        assert!(!path.exists());
        let backup = deletion.backup_path.unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "{\"a\":1}");
    }
}
