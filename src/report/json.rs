//! JSON output for stored listings, same shape as the snapshot file.

use crate::record::Record;

pub fn render<R: Record>(records: &[R]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| String::from("[]"))
}
