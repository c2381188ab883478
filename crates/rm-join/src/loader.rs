//! CSV pavement-survey loader.
//!
//! # CSV format
//!
//! One row per survey point.  Only `lon`, `lat` and `pci` are required;
//! the other columns may be empty.
//!
//! ```csv
//! lon,lat,pci,condition,inspection_date,surface
//! -81.7712,26.4615,82,Good,2024-03-18,asphalt
//! -81.7689,26.4630,47.5,,2023-11-02,
//! -81.7650,26.4598,91,,,concrete
//! ```
//!
//! | Column            | Parsed as                                           |
//! |-------------------|-----------------------------------------------------|
//! | `condition`       | [`PciCondition::parse`] (case-insensitive label)    |
//! | `inspection_date` | ISO `YYYY-MM-DD`                                    |
//!
//! Scores are not range-checked here; [`join_pci`](crate::join_pci) rejects
//! and counts out-of-range records so one bad row does not lose the file.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use rm_core::GeoPoint;
use rm_spatial::PciCondition;

use crate::{JoinError, JoinResult, PciRecord};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PciRow {
    lon:             f64,
    lat:             f64,
    pci:             f64,
    #[serde(default)]
    condition:       Option<String>,
    #[serde(default)]
    inspection_date: Option<String>,
    #[serde(default)]
    surface:         Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load survey records from a CSV file.
pub fn load_pci_csv(path: &Path) -> JoinResult<Vec<PciRecord>> {
    let file = std::fs::File::open(path)?;
    let records = load_pci_reader(file)?;
    log::info!("[PciLoader] {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Like [`load_pci_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_pci_reader<R: Read>(reader: R) -> JoinResult<Vec<PciRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<PciRow>()
        .enumerate()
        .map(|(i, result)| {
            // Header is line 1.
            let line = i + 2;
            let row = result.map_err(|e| JoinError::Parse(format!("line {line}: {e}")))?;
            to_record(row, line)
        })
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_record(row: PciRow, line: usize) -> JoinResult<PciRecord> {
    let condition = non_empty(row.condition)
        .map(|label| {
            PciCondition::parse(&label).ok_or_else(|| {
                JoinError::Parse(format!(
                    "line {line}: invalid condition {label:?}: expected Excellent, Good, Fair, Poor, or Critical"
                ))
            })
        })
        .transpose()?;

    let inspection_date = non_empty(row.inspection_date)
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                JoinError::Parse(format!("line {line}: invalid inspection_date {raw:?}: {e}"))
            })
        })
        .transpose()?;

    Ok(PciRecord {
        location: GeoPoint::new(row.lon, row.lat),
        score: row.pci,
        condition,
        inspection_date,
        surface: non_empty(row.surface),
    })
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}
