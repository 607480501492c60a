//! JSON snapshot storage.
//!
//! One file per listing, holding the records in page order. A snapshot is
//! never patched: `save` writes the whole sequence to a sibling temp file
//! and renames it over the old one.

pub mod diff;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::Record;

/// Load the stored listing at `path`.
///
/// Returns `None` when there is nothing usable on disk. Unreadable and
/// undecodable files are treated the same as missing ones so the next
/// cycle bootstraps a fresh snapshot.
pub fn load<R: Record>(path: &Path) -> Option<Vec<R>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no stored snapshot");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "stored snapshot is unreadable");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(records) => Some(records),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "stored snapshot could not be decoded");
            None
        }
    }
}

/// Replace the snapshot at `path` with `records`.
pub fn save<R: Record>(path: &Path, records: &[R]) -> Result<()> {
    write_snapshot(path, records).map_err(|source| Error::Save {
        path: path.to_path_buf(),
        source,
    })
}

fn write_snapshot<R: Record>(path: &Path, records: &[R]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    debug!(path = %path.display(), records = records.len(), "snapshot saved");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "snapshot".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DriverRecord, FirmwareRecord};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn drivers() -> Vec<DriverRecord> {
        vec![
            DriverRecord {
                name: "Chipset Driver".to_string(),
                version: "10.1.18".to_string(),
                updated_at: date(2023, 1, 5),
            },
            DriverRecord {
                name: "Display Driver".to_string(),
                version: "31.0.101".to_string(),
                updated_at: date(2023, 3, 14),
            },
            DriverRecord {
                name: "Display Driver".to_string(),
                version: "30.0.15".to_string(),
                updated_at: date(2022, 11, 2),
            },
        ]
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let loaded: Option<Vec<DriverRecord>> = load(&dir.path().join("drivers.json"));
        assert!(loaded.is_none());
    }

    #[test]
    fn corrupt_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drivers.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded: Option<Vec<DriverRecord>> = load(&path);
        assert!(loaded.is_none());
    }

    #[test]
    fn save_then_load_keeps_order_and_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drivers.json");

        save(&path, &drivers()).unwrap();
        let loaded: Vec<DriverRecord> = load(&path).unwrap();

        assert_eq!(loaded, drivers());
    }

    #[test]
    fn save_replaces_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bios.json");

        let first = vec![
            FirmwareRecord { version: "1.02".to_string(), updated_at: date(2022, 6, 1) },
            FirmwareRecord { version: "1.03".to_string(), updated_at: date(2022, 9, 1) },
        ];
        let second = vec![FirmwareRecord { version: "1.04".to_string(), updated_at: date(2023, 2, 1) }];

        save(&path, &first).unwrap();
        save(&path, &second).unwrap();

        let loaded: Vec<FirmwareRecord> = load(&path).unwrap();
        assert_eq!(loaded, second);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("drivers.json");

        save(&path, &drivers()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn fields_are_written_in_declaration_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drivers.json");
        save(&path, &drivers()[..1]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let name = text.find("\"name\"").unwrap();
        let version = text.find("\"version\"").unwrap();
        let updated = text.find("\"updated_at\": \"2023-01-05\"").unwrap();
        assert!(name < version && version < updated);
    }

    #[test]
    fn failed_write_keeps_stored_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drivers.json");
        save(&path, &drivers()).unwrap();
        let stored = fs::read_to_string(&path).unwrap();

        // a directory where the temp file should go makes the write fail
        fs::create_dir(temp_path(&path)).unwrap();

        let err = save(&path, &drivers()[..1]).unwrap_err();
        assert!(matches!(err, Error::Save { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), stored);
    }

    #[test]
    fn save_into_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = save(&blocker.join("drivers.json"), &drivers()).unwrap_err();
        assert!(matches!(err, Error::Save { .. }));
    }
}
