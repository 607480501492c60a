//! Listing extraction from rendered support-page markup.
//!
//! Both listings are plain tables. The first cell holds the display name
//! and version joined by a fixed label, the fourth holds the release date:
//!
//! ```text
//! | Chipset Driver バージョン:10.1.18 | ... | ... | 2023/1/5 |
//! ```

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::ExtractError;
use crate::record::{DriverRecord, FirmwareRecord, RecordKind};

/// Label separating the display name from the version in the first cell.
pub const VERSION_LABEL: &str = "バージョン:";

/// Date format of the release column (month and day are not zero padded).
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Where a listing lives on the page.
#[derive(Debug, Clone, Copy)]
pub struct ListingLayout {
    /// Element that only exists once the listing has rendered.
    pub container: &'static str,
    pub rows: &'static str,
    pub label_cell: &'static str,
    pub date_cell: &'static str,
}

pub const DRIVER_LAYOUT: ListingLayout = ListingLayout {
    container: "div#Download",
    rows: "div#Download > table > tbody > tr",
    label_cell: "td:first-child",
    date_cell: "td:nth-child(4)",
};

pub const FIRMWARE_LAYOUT: ListingLayout = ListingLayout {
    container: "div#BIOS",
    rows: "div#BIOS > table > tbody > tr",
    label_cell: "td:first-child",
    date_cell: "td:nth-child(4)",
};

pub fn layout(kind: RecordKind) -> &'static ListingLayout {
    match kind {
        RecordKind::Driver => &DRIVER_LAYOUT,
        RecordKind::Firmware => &FIRMWARE_LAYOUT,
    }
}

/// One table row reduced to its three fields.
struct RawRow {
    name: String,
    version: String,
    updated_at: NaiveDate,
}

/// Extract the driver listing, keeping only rows whose text mentions
/// `os_filter`. An empty filter keeps every row.
pub fn extract_drivers(markup: &str, os_filter: &str) -> Result<Vec<DriverRecord>, ExtractError> {
    let rows = extract_rows(markup, &DRIVER_LAYOUT, |row| {
        os_filter.is_empty() || row.text().collect::<String>().contains(os_filter)
    })?;

    let mut drivers = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        if row.name.is_empty() {
            return Err(ExtractError::FieldNotFound { row: index + 1, field: "driver name" });
        }
        drivers.push(DriverRecord {
            name: row.name,
            version: row.version,
            updated_at: row.updated_at,
        });
    }
    Ok(drivers)
}

pub fn extract_firmware(markup: &str) -> Result<Vec<FirmwareRecord>, ExtractError> {
    let rows = extract_rows(markup, &FIRMWARE_LAYOUT, |_| true)?;
    Ok(rows
        .into_iter()
        .map(|row| FirmwareRecord {
            version: row.version,
            updated_at: row.updated_at,
        })
        .collect())
}

fn extract_rows(
    markup: &str,
    layout: &ListingLayout,
    keep: impl Fn(&ElementRef) -> bool,
) -> Result<Vec<RawRow>, ExtractError> {
    let rows_sel = selector(layout.rows)?;
    let label_sel = selector(layout.label_cell)?;
    let date_sel = selector(layout.date_cell)?;

    let document = Html::parse_document(markup);
    let mut rows = Vec::new();

    for row in document.select(&rows_sel).filter(|row| keep(row)) {
        let index = rows.len() + 1;

        let label = row
            .select(&label_sel)
            .next()
            .map(cell_text)
            .ok_or(ExtractError::FieldNotFound { row: index, field: "name/version cell" })?;
        let (name, version) = split_label(&label)
            .ok_or(ExtractError::FieldNotFound { row: index, field: "version label" })?;

        let date_text = row
            .select(&date_sel)
            .next()
            .map(cell_text)
            .ok_or(ExtractError::FieldNotFound { row: index, field: "date cell" })?;
        let updated_at = parse_date(&date_text)
            .ok_or_else(|| ExtractError::InvalidDate { row: index, text: date_text.clone() })?;

        rows.push(RawRow {
            name: name.to_string(),
            version: version.to_string(),
            updated_at,
        });
    }

    if rows.is_empty() {
        return Err(ExtractError::Empty(layout.rows.to_string()));
    }

    debug!(selector = layout.rows, rows = rows.len(), "extracted listing");
    Ok(rows)
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("{css}: {e}")))
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Split `"<name>バージョン:<version>"` at the last label. Both halves are
/// trimmed; the version must not be empty.
fn split_label(text: &str) -> Option<(&str, &str)> {
    let pos = text.rfind(VERSION_LABEL)?;
    let name = text[..pos].trim();
    let version = text[pos + VERSION_LABEL.len()..].trim();
    if version.is_empty() {
        return None;
    }
    Some((name, version))
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(container: &str, rows: &[(&str, &str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(label, os, date)| {
                format!("<tr><td>{label}</td><td>{os}</td><td>64bit</td><td>{date}</td></tr>")
            })
            .collect();
        format!(
            "<html><body><div id=\"{container}\"><table><tbody>{body}</tbody></table></div></body></html>"
        )
    }

    #[test]
    fn drivers_split_name_and_version() {
        let markup = page(
            "Download",
            &[
                ("Chipset Driver バージョン:10.1.18", "Windows 11", "2023/1/5"),
                ("Display Driver バージョン:31.0.101", "Windows 11", "2023/12/14"),
            ],
        );

        let drivers = extract_drivers(&markup, "").unwrap();

        assert_eq!(drivers.len(), 2);
        assert_eq!(drivers[0].name, "Chipset Driver");
        assert_eq!(drivers[0].version, "10.1.18");
        assert_eq!(drivers[0].updated_at, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
        assert_eq!(drivers[1].updated_at, NaiveDate::from_ymd_opt(2023, 12, 14).unwrap());
    }

    #[test]
    fn os_filter_selects_rows() {
        let markup = page(
            "Download",
            &[
                ("Audio バージョン:6.0", "Windows 10", "2022/3/1"),
                ("Audio バージョン:6.1", "Windows 11", "2023/3/1"),
            ],
        );

        let drivers = extract_drivers(&markup, "Windows 11").unwrap();

        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].version, "6.1");
    }

    #[test]
    fn filter_matching_nothing_is_empty() {
        let markup = page("Download", &[("Audio バージョン:6.0", "Windows 10", "2022/3/1")]);
        let err = extract_drivers(&markup, "Windows 11").unwrap_err();
        assert!(matches!(err, ExtractError::Empty(_)));
    }

    #[test]
    fn missing_table_is_empty() {
        let err = extract_drivers("<html><body><p>maintenance</p></body></html>", "").unwrap_err();
        assert!(matches!(err, ExtractError::Empty(_)));
    }

    #[test]
    fn missing_label_is_reported_with_row() {
        let markup = page(
            "Download",
            &[
                ("Audio バージョン:6.0", "Windows 11", "2022/3/1"),
                ("Audio 6.1", "Windows 11", "2023/3/1"),
            ],
        );

        let err = extract_drivers(&markup, "").unwrap_err();
        assert!(matches!(err, ExtractError::FieldNotFound { row: 2, field: "version label" }));
    }

    #[test]
    fn driver_without_name_is_rejected() {
        let markup = page("Download", &[("バージョン:6.0", "Windows 11", "2022/3/1")]);
        let err = extract_drivers(&markup, "").unwrap_err();
        assert!(matches!(err, ExtractError::FieldNotFound { row: 1, field: "driver name" }));
    }

    #[test]
    fn bad_date_is_reported() {
        let markup = page("Download", &[("Audio バージョン:6.0", "Windows 11", "March 2022")]);
        let err = extract_drivers(&markup, "").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDate { row: 1, .. }));
    }

    #[test]
    fn firmware_uses_version_only() {
        let markup = page(
            "BIOS",
            &[
                ("BIOS バージョン:1.11", "", "2023/4/1"),
                ("BIOS バージョン:1.10", "", "2023/1/1"),
            ],
        );

        let firmware = extract_firmware(&markup).unwrap();

        assert_eq!(firmware.len(), 2);
        assert_eq!(firmware[0].version, "1.11");
        assert_eq!(firmware[1].updated_at, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn listings_do_not_leak_into_each_other() {
        let markup = page("Download", &[("Audio バージョン:6.0", "Windows 11", "2022/3/1")]);
        assert!(matches!(extract_firmware(&markup), Err(ExtractError::Empty(_))));
    }

    #[test]
    fn split_uses_last_label() {
        assert_eq!(
            split_label("Tool バージョン:2 バージョン:2.1"),
            Some(("Tool バージョン:2", "2.1"))
        );
        assert_eq!(split_label("Tool バージョン:"), None);
    }
}
