use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Which listing on the support page a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Driver,
    Firmware,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Driver, RecordKind::Firmware];

    /// Noun used in notification text.
    pub fn noun(&self) -> &'static str {
        match self {
            RecordKind::Driver => "driver",
            RecordKind::Firmware => "BIOS",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Driver => "drivers",
            RecordKind::Firmware => "bios",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared comparison surface of the two listing variants.
///
/// `key` is what entries are matched on across snapshots. It is expected to
/// be unique within a listing but nothing enforces that.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const KIND: RecordKind;

    fn key(&self) -> &str;
    fn version(&self) -> &str;
    fn updated_at(&self) -> NaiveDate;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub name: String,
    pub version: String,
    pub updated_at: NaiveDate,
}

impl Record for DriverRecord {
    const KIND: RecordKind = RecordKind::Driver;

    fn key(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn updated_at(&self) -> NaiveDate {
        self.updated_at
    }
}

/// BIOS rows carry no separate name, so the version doubles as the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareRecord {
    pub version: String,
    pub updated_at: NaiveDate,
}

impl Record for FirmwareRecord {
    const KIND: RecordKind = RecordKind::Firmware;

    fn key(&self) -> &str {
        &self.version
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn updated_at(&self) -> NaiveDate {
        self.updated_at
    }
}
