/// Default upper bound for [`crate::FilesService::read_file`] (10 MiB).
pub const DEFAULT_MAX_READ_BYTES: u64 = 10 * 1024 * 1024;

/// Extension given to backup copies made before a delete.
pub const BACKUP_EXTENSION: &str = "backup";

/// `chrono` format of the timestamp embedded in backup file names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
