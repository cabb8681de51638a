//! The `overlay.pxt` data file: one `KEY: value` line per field, closed by an
//! end marker line.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::model::{FieldKey, FieldMap};

pub const END_MARKER: &str = "--- End of Extracted Data ---";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayEntry {
    pub label: String,
    pub value: String,
}

/// Absent fields are written with an empty value.
pub fn render_overlay(fields: &FieldMap) -> String {
    let mut out = String::new();
    for (key, value) in fields.iter() {
        out.push_str(key.as_str());
        out.push_str(": ");
        out.push_str(value.unwrap_or_default());
        out.push('\n');
    }
    out.push('\n');
    out.push_str(END_MARKER);
    out.push('\n');
    out
}

pub fn write_overlay(path: &Path, fields: &FieldMap) -> Result<()> {
    fs::write(path, render_overlay(fields))
        .with_context(|| format!("failed to write overlay file: {}", path.display()))
}

/// Accepts `KEY: value` and `KEY= value`. Reading stops at the first line
/// starting with `---`; lines without a separator are skipped.
pub fn parse_overlay(text: &str) -> Vec<OverlayEntry> {
    let mut entries = Vec::new();

    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim_start().starts_with("---") {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let Some(split_at) = line.find([':', '=']) else {
            debug!(line, "overlay line without separator skipped");
            continue;
        };

        let label = line[..split_at].trim().to_string();
        let rest = &line[split_at + 1..];
        let value = rest.strip_prefix(' ').unwrap_or(rest).to_string();
        entries.push(OverlayEntry { label, value });
    }

    entries
}

pub fn read_overlay(path: &Path) -> Result<Vec<OverlayEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read overlay file: {}", path.display()))?;
    Ok(parse_overlay(&text))
}

/// Rebuilds a field map from overlay entries. Unknown labels are ignored and
/// empty values read back as absent.
pub fn entries_to_fields(entries: &[OverlayEntry]) -> FieldMap {
    let mut fields = FieldMap::new();
    for entry in entries {
        match FieldKey::parse(&entry.label) {
            Some(key) if !entry.value.is_empty() => fields.set(key, Some(entry.value.clone())),
            Some(_) => {}
            None => debug!(label = entry.label.as_str(), "unknown overlay label ignored"),
        }
    }
    fields
}

/// Two-column label/value table.
pub fn format_table<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let rows = rows.into_iter().collect::<Vec<(&str, &str)>>();
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Label".len());

    let mut out = format!("{:<width$}  Value\n", "Label");
    out.push_str(&format!("{}  {}\n", "-".repeat(width), "-".repeat(5)));
    for (label, value) in rows {
        out.push_str(&format!("{label:<width$}  {value}\n"));
    }
    out
}

pub fn field_table(fields: &FieldMap) -> String {
    format_table(
        fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.unwrap_or_default())),
    )
}

pub fn entry_table(entries: &[OverlayEntry]) -> String {
    format_table(
        entries
            .iter()
            .map(|entry| (entry.label.as_str(), entry.value.as_str())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> FieldMap {
        let mut fields = FieldMap::new();
        fields.set_str(FieldKey::County, "DeSoto");
        fields.set_str(FieldKey::Byr1Nam1, "John Smith");
        fields.set_str(FieldKey::Byr1Rel1, "");
        fields.set_str(FieldKey::SettDate, "07/15/2025");
        fields.set_str(FieldKey::Ag702Ad1, "100 Poplar Parkway: Suite=4");
        fields.set_str(FieldKey::Slr1Adr1, "  indented  ");
        fields
    }

    #[test]
    fn written_overlay_reads_back_every_present_value() {
        let fields = sample_fields();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("overlay.pxt");
        write_overlay(&path, &fields).expect("overlay should be written");

        let entries = read_overlay(&path).expect("overlay should be read");
        assert_eq!(entries.len(), FieldKey::ALL.len());

        for (key, value) in fields.iter() {
            let Some(value) = value else { continue };
            let entry = entries
                .iter()
                .find(|entry| entry.label == key.as_str())
                .expect("every key should be written");
            assert_eq!(entry.value, value, "{key}");
        }
    }

    #[test]
    fn overlay_ends_with_marker() {
        let text = render_overlay(&FieldMap::new());
        assert!(text.starts_with("COUNTY: \n"));
        assert!(text.ends_with("\n\n--- End of Extracted Data ---\n"));
    }

    #[test]
    fn parse_accepts_both_separators_and_stops_at_marker() {
        let text = "COUNTY: DeSoto\r\nSALEPRIC= 350000.00\nnot a field line\n\n\
                    --- End of Extracted Data ---\nBYR1NAM1: after marker\n";
        let entries = parse_overlay(text);
        assert_eq!(
            entries,
            vec![
                OverlayEntry {
                    label: "COUNTY".to_string(),
                    value: "DeSoto".to_string()
                },
                OverlayEntry {
                    label: "SALEPRIC".to_string(),
                    value: "350000.00".to_string()
                },
            ]
        );
    }

    #[test]
    fn entries_rebuild_field_map() {
        let entries = parse_overlay("BYR1NAM1: Jane Doe\nBYR1REL1: \nMYSTERY: x\n");
        let fields = entries_to_fields(&entries);
        assert_eq!(fields.get(FieldKey::Byr1Nam1), Some("Jane Doe"));
        assert_eq!(fields.get(FieldKey::Byr1Rel1), None);
        assert_eq!(fields.len(), FieldKey::ALL.len());
    }

    #[test]
    fn table_aligns_labels() {
        let table = format_table([("COUNTY", "DeSoto"), ("AG702CONTLIC", "998877")]);
        let lines = table.lines().collect::<Vec<&str>>();
        assert_eq!(lines[0], "Label         Value");
        assert_eq!(lines[2], "COUNTY        DeSoto");
        assert_eq!(lines[3], "AG702CONTLIC  998877");
    }
}
