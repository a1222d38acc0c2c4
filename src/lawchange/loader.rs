//! JSON loader for law-change overlay files
//!
//! The file carries the proposal span and a list of entries. All parameter
//! validation happens here, at load time, so a calculation run never sees a
//! malformed overlay.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use super::{LawChangeEntry, LawChangeId, LawChangeOverlay};

#[derive(Debug, Deserialize)]
struct OverlayFile {
    span_start: u16,
    span_end: u16,
    #[serde(default)]
    entries: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    id: LawChangeId,
    #[serde(flatten)]
    entry: LawChangeEntry,
}

/// Parse an overlay from a JSON string
pub fn parse_overlay(json: &str) -> anyhow::Result<LawChangeOverlay> {
    let file: OverlayFile = serde_json::from_str(json)?;
    let overlay = build(file)?;
    Ok(overlay)
}

/// Load an overlay from a JSON file
pub fn load_overlay<P: AsRef<Path>>(path: P) -> anyhow::Result<LawChangeOverlay> {
    let text = std::fs::read_to_string(path)?;
    parse_overlay(&text)
}

fn build(file: OverlayFile) -> Result<LawChangeOverlay> {
    LawChangeOverlay::from_entries(
        file.span_start,
        file.span_end,
        file.entries.into_iter().map(|fe| (fe.id, fe.entry)).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lawchange::PhaseType;

    #[test]
    fn test_parse_minimal_overlay() {
        let json = r#"{
            "span_start": 2027,
            "span_end": 2060,
            "entries": [
                {
                    "id": "ColaCap",
                    "indicator": 1,
                    "start_year": 2027,
                    "end_year": 2060,
                    "phase": "Immediate",
                    "amounts": [2.0]
                }
            ]
        }"#;
        let overlay = parse_overlay(json).unwrap();
        assert_eq!(overlay.active_count(), 1);
        let entry = overlay.entry(LawChangeId::ColaCap).unwrap();
        assert_eq!(entry.phase, PhaseType::Immediate);
        assert_eq!(entry.amount(), Some(2.0));
    }

    #[test]
    fn test_parse_rejects_bad_parameters() {
        // ColaCap with no percentage must fail at load time
        let json = r#"{
            "span_start": 2027,
            "span_end": 2060,
            "entries": [
                {"id": "ColaCap", "indicator": 1, "start_year": 2027, "end_year": 2060}
            ]
        }"#;
        assert!(parse_overlay(json).is_err());
    }

    #[test]
    fn test_empty_overlay_is_present_law() {
        let overlay = parse_overlay(r#"{"span_start": 2027, "span_end": 2060}"#).unwrap();
        assert_eq!(overlay.active_count(), 0);
    }
}
