//! Listing change detector.
//!
//! Compares a freshly scraped listing with the stored one:
//! - No stored listing: bootstrap, persist as-is
//! - Listing grew or shrank: report keys missing from the other side
//! - Same length: walk both in lockstep and report later dates per position
//!
//! Keys are not unique on the vendor page (two display drivers share a
//! name), so there is no general set diff with attribution. When keys at
//! the same position disagree the detector gives up for this cycle and
//! keeps the stored listing so a human can work out what moved.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::record::{Record, RecordKind};

/// Date format used in notification text.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Created,
    ListingGrew,
    Added {
        key: String,
    },
    ListingShrank,
    Removed {
        key: String,
    },
    Updated {
        key: String,
        version: String,
        updated_at: NaiveDate,
    },
    /// `position` is 1-based, as a reader would count rows on the page.
    VersionMismatch {
        position: usize,
        previous_version: String,
        current_version: String,
    },
    OrderChanged,
    ManualDeletionRequired,
    Source {
        url: String,
    },
    NoUpdates,
}

impl ChangeEvent {
    /// Advisory events are printed locally and never reach the notifier.
    pub fn is_advisory(&self) -> bool {
        matches!(self, ChangeEvent::NoUpdates)
    }

    pub fn render(&self, kind: RecordKind) -> String {
        let noun = kind.noun();
        match self {
            ChangeEvent::Created => format!("Created a {noun} snapshot as none was stored"),
            ChangeEvent::ListingGrew => format!("New {noun} was added"),
            ChangeEvent::Added { key } => format!("{noun} added: {key}"),
            ChangeEvent::ListingShrank => format!("Existing {noun} was removed"),
            ChangeEvent::Removed { key } => format!("{noun} removed: {key}"),
            ChangeEvent::Updated { key, version, updated_at } => format!(
                "{noun} updated: {key} → new version {version} (updated {})",
                updated_at.format(DATE_FORMAT)
            ),
            ChangeEvent::VersionMismatch { position, previous_version, current_version } => format!(
                "{noun} version mismatch at position {position}: stored {previous_version}, listed {current_version}"
            ),
            ChangeEvent::OrderChanged => format!(
                "{noun} listing order has changed. Some entries may have been added or removed, please verify on the website."
            ),
            ChangeEvent::ManualDeletionRequired => {
                format!("Please delete the stored {noun} snapshot file manually.")
            }
            ChangeEvent::Source { url } => format!("source: {url}"),
            ChangeEvent::NoUpdates => format!("No {noun} updates available"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistDecision {
    Overwrite,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub events: Vec<ChangeEvent>,
    pub decision: PersistDecision,
}

impl Detection {
    fn overwrite(events: Vec<ChangeEvent>) -> Self {
        Detection { events, decision: PersistDecision::Overwrite }
    }

    fn hold(events: Vec<ChangeEvent>) -> Self {
        Detection { events, decision: PersistDecision::Hold }
    }
}

/// Compare `current` against `previous` and decide whether to persist it.
///
/// Never fails: any pair of listings, empty ones included, yields a
/// decision and a (possibly single-event) report.
pub fn detect<R: Record>(current: &[R], previous: Option<&[R]>, source_url: &str) -> Detection {
    let Some(previous) = previous else {
        return Detection::overwrite(vec![ChangeEvent::Created]);
    };

    let source = || ChangeEvent::Source { url: source_url.to_string() };

    if current.len() > previous.len() {
        let mut events = vec![ChangeEvent::ListingGrew];
        events.extend(
            missing_from(current, previous).into_iter().map(|key| ChangeEvent::Added { key: key.to_string() }),
        );
        events.push(source());
        return Detection::overwrite(events);
    }

    if current.len() < previous.len() {
        let mut events = vec![ChangeEvent::ListingShrank];
        events.extend(
            missing_from(previous, current).into_iter().map(|key| ChangeEvent::Removed { key: key.to_string() }),
        );
        events.push(source());
        return Detection::overwrite(events);
    }

    let mut events = Vec::new();
    for (index, (now, before)) in current.iter().zip(previous).enumerate() {
        if now.key() != before.key() {
            // position and key disagree: anything reported from here on
            // could be attributed to the wrong entry
            events.push(ChangeEvent::VersionMismatch {
                position: index + 1,
                previous_version: before.version().to_string(),
                current_version: now.version().to_string(),
            });
            events.push(ChangeEvent::OrderChanged);
            events.push(ChangeEvent::ManualDeletionRequired);
            events.push(source());
            return Detection::hold(events);
        }

        if now.updated_at() > before.updated_at() {
            events.push(ChangeEvent::Updated {
                key: now.key().to_string(),
                version: now.version().to_string(),
                updated_at: now.updated_at(),
            });
        }
    }

    if events.is_empty() {
        return Detection::hold(vec![ChangeEvent::NoUpdates]);
    }

    events.push(source());
    Detection::overwrite(events)
}

/// Keys of `side` (in `side` order) that never occur in `other`, each
/// reported once at its first occurrence.
fn missing_from<'a, R: Record>(side: &'a [R], other: &'a [R]) -> Vec<&'a str> {
    let mut seen: HashSet<&str> = other.iter().map(Record::key).collect();
    side.iter()
        .map(Record::key)
        .filter(|key| seen.insert(*key))
        .collect()
}
