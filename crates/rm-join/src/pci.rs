//! Pavement Condition Index join.

use std::collections::HashSet;

use chrono::NaiveDate;

use rm_core::{GeoPoint, SegmentIdx, check_radius};
use rm_spatial::{PciCondition, RoadIndex, SpatialError};

use crate::JoinResult;

/// One pavement survey point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PciRecord {
    pub location:        GeoPoint,
    /// 0–100; records outside that range are rejected by [`join_pci`].
    pub score:           f64,
    /// Surveyor's label.  When absent the label is derived from `score`.
    pub condition:       Option<PciCondition>,
    pub inspection_date: Option<NaiveDate>,
    pub surface:         Option<String>,
}

impl PciRecord {
    pub fn new(location: GeoPoint, score: f64) -> Self {
        Self { location, score, condition: None, inspection_date: None, surface: None }
    }

    fn has_valid_score(&self) -> bool {
        self.score.is_finite() && (0.0..=100.0).contains(&self.score)
    }
}

/// Counts from one [`join_pci`] pass.
///
/// `joined + unmatched + rejected` equals the number of input records.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PciJoinReport {
    /// Records written onto a road.
    pub joined:        usize,
    /// Valid records with no road in range.
    pub unmatched:     usize,
    /// Records with an out-of-range score or unusable location.
    pub rejected:      usize,
    /// Distinct roads written; less than `joined` when records overlap.
    pub roads_updated: usize,
}

/// Write each record onto its nearest road within `radius_m`.
///
/// Records are applied in order and overwrite earlier values, so the last
/// record per road wins.  Joined roads get `synthetic = false`.  A record
/// without a `surface` keeps the road's tag-derived surface.
///
/// # Errors
///
/// [`JoinError::Spatial`](crate::JoinError::Spatial) for an invalid radius.
pub fn join_pci(index: &mut RoadIndex, records: &[PciRecord], radius_m: f64) -> JoinResult<PciJoinReport> {
    check_radius(radius_m).map_err(SpatialError::from)?;

    let mut report = PciJoinReport::default();
    let mut touched: HashSet<SegmentIdx> = HashSet::new();

    for (row, record) in records.iter().enumerate() {
        if !record.has_valid_score() {
            log::debug!("[PciJoin] record {row}: score {} outside 0..=100", record.score);
            report.rejected += 1;
            continue;
        }

        let target = match index.nearest(record.location.lon, record.location.lat, radius_m) {
            Ok(found) => found.map(|m| m.idx),
            Err(e) => {
                log::debug!("[PciJoin] record {row}: {e}");
                report.rejected += 1;
                continue;
            }
        };

        let Some(meta) = target.and_then(|idx| index.metadata_mut_at(idx)) else {
            report.unmatched += 1;
            continue;
        };

        meta.pci = Some(record.score);
        meta.pci_condition = Some(record.condition.unwrap_or_else(|| PciCondition::from_score(record.score)));
        meta.inspection_date = record.inspection_date;
        if let Some(surface) = &record.surface {
            meta.surface = Some(surface.clone());
        }
        meta.synthetic = false;

        report.joined += 1;
        if let Some(idx) = target {
            touched.insert(idx);
        }
    }
    report.roads_updated = touched.len();

    log::info!(
        "[PciJoin] {} records: {} joined onto {} roads, {} unmatched, {} rejected",
        records.len(),
        report.joined,
        report.roads_updated,
        report.unmatched,
        report.rejected
    );
    if report.unmatched > 0 {
        log::warn!("[PciJoin] {} record(s) had no road within {radius_m} m", report.unmatched);
    }
    Ok(report)
}
