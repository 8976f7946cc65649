//! # Formats
//!
//! Interchange formats of the working set. Pure transformations over bytes;
//! file I/O lives in the app layer.

pub mod backup;

pub use backup::{BACKUP_VERSION, Backup, MAX_BACKUP_SIZE, backup_to_json, parse_backup};
