//! Terminal table for stored listings.
//!
//! Rows keep page order. Driver listings get a name column; BIOS rows are
//! keyed by version so that column is dropped.

use crate::record::{Record, RecordKind};
use crate::store::diff::DATE_FORMAT;

const NAME_WIDTH: usize = 48;
const VERSION_WIDTH: usize = 20;

pub fn render<R: Record>(records: &[R]) -> String {
    if records.is_empty() {
        return String::from("Snapshot is empty.\n");
    }

    let with_name = R::KIND == RecordKind::Driver;
    let mut output = String::new();

    if with_name {
        output.push_str(&format!(
            "{:<4} {:<NAME_WIDTH$} {:<VERSION_WIDTH$} {}\n",
            "#", "Name", "Version", "Updated"
        ));
    } else {
        output.push_str(&format!("{:<4} {:<VERSION_WIDTH$} {}\n", "#", "Version", "Updated"));
    }
    output.push_str(&"-".repeat(if with_name { 86 } else { 37 }));
    output.push('\n');

    for (index, record) in records.iter().enumerate() {
        let updated = record.updated_at().format(DATE_FORMAT);
        if with_name {
            output.push_str(&format!(
                "{:<4} {:<NAME_WIDTH$} {:<VERSION_WIDTH$} {updated}\n",
                index + 1,
                truncate(record.key(), NAME_WIDTH),
                truncate(record.version(), VERSION_WIDTH),
            ));
        } else {
            output.push_str(&format!(
                "{:<4} {:<VERSION_WIDTH$} {updated}\n",
                index + 1,
                truncate(record.version(), VERSION_WIDTH),
            ));
        }
    }

    output.push_str(&format!("\n{} {} entries\n", records.len(), R::KIND.noun()));
    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}
