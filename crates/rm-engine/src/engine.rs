//! The `RoadEngine` facade.

use std::collections::HashSet;

use rm_core::{BBox, RawNode, RawWay, RoadId};
use rm_join::{
    PciJoinReport, PciRecord, SignalLoadReport, SignalRegistry, TrafficSignal, associate_signals,
    fill_synthetic_pci, join_pci,
};
use rm_spatial::{
    MalformedTag, RoadIndex, RoadMatch, RoadSegment, SpatialError, SpatialResult,
    build_road_segment_with_warnings,
};
use rm_traffic::{TrafficLevel, TrafficMetrics, TrafficStore};

use crate::{EngineConfig, EngineError, EngineResult, EngineStats, LoadReport};

/// Owns the road index and every per-road auxiliary store.
///
/// # Lifecycle
///
/// ```text
/// build (RoadEngineBuilder) → load_network → load_signals / join_pci
///   → fill_synthetic_pci (if enabled) → serve reads
/// ```
///
/// Structural changes (`load_network`, joins, `clear`) take `&mut self`, so
/// there is at most one writer.  Reads and traffic updates take `&self`; the
/// engine is `Send + Sync` and can be shared behind an `Arc` once loaded.
pub struct RoadEngine {
    pub(crate) config:  EngineConfig,
    pub(crate) index:   RoadIndex,
    pub(crate) traffic: TrafficStore,
    pub(crate) signals: SignalRegistry,
}

type Built = SpatialResult<(RoadSegment, Vec<MalformedTag>)>;

impl RoadEngine {
    pub(crate) fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            index:   RoadIndex::new(),
            traffic: TrafficStore::new(),
            signals: SignalRegistry::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only access to the underlying index.
    pub fn index(&self) -> &RoadIndex {
        &self.index
    }

    pub fn traffic(&self) -> &TrafficStore {
        &self.traffic
    }

    // ── Network loading ───────────────────────────────────────────────────

    /// Build a segment per way and add the valid ones to the index.
    ///
    /// Additive: existing roads are kept and a way whose id is already
    /// indexed (or repeated within `ways`) is skipped.  Ways with fewer than
    /// two points or non-finite coordinates are skipped and reported, never
    /// fatal.  Segments are inserted in input order.
    pub fn load_network(&mut self, ways: &[RawWay]) -> LoadReport {
        let built = build_all(ways);

        let mut report = LoadReport::default();
        let mut batch_ids: HashSet<RoadId> = HashSet::new();
        let mut accepted: Vec<RoadSegment> = Vec::with_capacity(built.len());

        for (way, result) in ways.iter().zip(built) {
            match result {
                Ok((segment, malformed)) => {
                    if self.index.contains(&segment.id) || !batch_ids.insert(segment.id.clone()) {
                        log::warn!("[RoadEngine] skipping way {}: duplicate road id {}", way.id, segment.id);
                        report.skip(&way.id, format!("duplicate road id {}", segment.id));
                        continue;
                    }
                    for tag in &malformed {
                        log::debug!("[RoadEngine] way {}: ignoring malformed {}={:?}", way.id, tag.key, tag.value);
                    }
                    report.malformed_tags += malformed.len();
                    accepted.push(segment);
                }
                Err(e) => {
                    let reason = match e {
                        SpatialError::InvalidGeometry { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    log::warn!("[RoadEngine] skipping way {}: {reason}", way.id);
                    report.skip(&way.id, reason);
                }
            }
        }

        report.loaded = accepted.len();
        for e in self.index.extend(accepted) {
            // Duplicates were filtered above.
            log::error!("[RoadEngine] insert rejected after duplicate check: {e}");
            report.loaded -= 1;
        }

        log::info!(
            "[RoadEngine] loaded {} roads ({} skipped, {} malformed tags); index now {}",
            report.loaded,
            report.skipped,
            report.malformed_tags,
            self.index.len()
        );
        report
    }

    /// [`clear`](Self::clear) followed by [`load_network`](Self::load_network).
    /// Loading the same input twice yields the same index.
    pub fn reload_network(&mut self, ways: &[RawWay]) -> EngineResult<LoadReport> {
        self.clear()?;
        Ok(self.load_network(ways))
    }

    /// Drop every road, traffic snapshot and signal.
    pub fn clear(&mut self) -> EngineResult<()> {
        self.index.clear();
        self.traffic.clear()?;
        self.signals.clear();
        log::debug!("[RoadEngine] cleared");
        Ok(())
    }

    // ── Road lookup ───────────────────────────────────────────────────────

    /// Nearest road strictly within `radius_m` of `(lon, lat)`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Spatial`] for non-finite coordinates or an invalid
    /// radius.  Nothing in range is `Ok(None)`.
    pub fn find_nearest_road(&self, lon: f64, lat: f64, radius_m: f64) -> EngineResult<Option<&RoadSegment>> {
        Ok(self.index.nearest(lon, lat, radius_m)?.map(|m| m.segment))
    }

    /// Every road within `radius_m`, nearest first.
    pub fn roads_near(&self, lon: f64, lat: f64, radius_m: f64) -> EngineResult<Vec<RoadMatch<'_>>> {
        Ok(self.index.within(lon, lat, radius_m)?)
    }

    pub fn roads_in_bbox(&self, bbox: &BBox) -> Vec<&RoadSegment> {
        self.index.in_bbox(bbox)
    }

    pub fn get_road(&self, id: &RoadId) -> Option<&RoadSegment> {
        self.index.get(id)
    }

    /// Owned snapshot of every road in insertion order.
    pub fn all_roads(&self) -> Vec<RoadSegment> {
        self.index.iter().cloned().collect()
    }

    // ── Traffic ───────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// [`EngineError::UnknownRoad`] if `road` is not indexed; traffic errors
    /// for invalid volumes.
    pub fn set_traffic_data(&self, road: &RoadId, metrics: TrafficMetrics) -> EngineResult<()> {
        if !self.index.contains(road) {
            return Err(EngineError::UnknownRoad(road.clone()));
        }
        self.traffic.set(road.clone(), metrics)?;
        Ok(())
    }

    /// Current snapshot for `road`, or `None` if nothing was set.
    pub fn traffic_data(&self, road: &RoadId) -> EngineResult<Option<TrafficMetrics>> {
        let snapshot = self.traffic.get(road)?;
        if snapshot.is_some() && !self.index.contains(road) {
            return Err(inconsistency(format!("traffic snapshot for {road} which is not indexed")));
        }
        Ok(snapshot)
    }

    /// Roads whose current snapshot is at `level`, sorted by id.
    pub fn roads_with_traffic_level(&self, level: TrafficLevel) -> EngineResult<Vec<&RoadSegment>> {
        self.traffic
            .roads_with_level(level)?
            .iter()
            .map(|id| {
                self.index
                    .get(id)
                    .ok_or_else(|| inconsistency(format!("traffic snapshot for {id} which is not indexed")))
            })
            .collect()
    }

    // ── Point-feature joins ───────────────────────────────────────────────

    /// Replace the signal set: associate each node within the configured
    /// signal radius.  Nodes with no road in range are kept as orphaned.
    pub fn load_signals(&mut self, nodes: &[RawNode]) -> EngineResult<SignalLoadReport> {
        self.signals.clear();
        self.traffic.clear_signal_counts()?;
        let report = associate_signals(
            &self.index,
            &self.traffic,
            &mut self.signals,
            nodes,
            self.config.signal_radius_m,
        )?;
        Ok(report)
    }

    /// Join survey records within the configured PCI radius.
    pub fn join_pci(&mut self, records: &[PciRecord]) -> EngineResult<PciJoinReport> {
        Ok(join_pci(&mut self.index, records, self.config.pci_radius_m)?)
    }

    /// Apply the configured synthetic policy.  `0` when it is disabled.
    pub fn fill_synthetic_pci(&mut self) -> EngineResult<usize> {
        Ok(fill_synthetic_pci(&mut self.index, &self.config.synthetic)?)
    }

    pub fn signals(&self) -> impl Iterator<Item = &TrafficSignal> {
        self.signals.iter()
    }

    pub fn orphaned_signals(&self) -> Vec<&TrafficSignal> {
        self.signals.orphaned().collect()
    }

    pub fn signals_for_road(&self, road: &RoadId) -> Vec<&TrafficSignal> {
        self.signals.for_road(road)
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    pub fn stats(&self) -> EngineResult<EngineStats> {
        Ok(EngineStats {
            road_count:         self.index.len(),
            index_size:         self.index.tree_size(),
            traffic_data_count: self.traffic.len()?,
            signal_count:       self.signals.len(),
            orphaned_signals:   self.signals.orphaned_count(),
        })
    }

    /// Verify that the tree, the auxiliary stores and the signal registry
    /// only refer to indexed roads.
    ///
    /// # Errors
    ///
    /// [`EngineError::IndexInconsistency`] describing the first violation.
    pub fn check_consistency(&self) -> EngineResult<()> {
        if self.index.tree_size() != self.index.len() {
            return Err(inconsistency(format!(
                "R-tree holds {} entries for {} roads",
                self.index.tree_size(),
                self.index.len()
            )));
        }
        if let Some(id) = self.traffic.road_ids()?.into_iter().find(|id| !self.index.contains(id)) {
            return Err(inconsistency(format!("traffic store refers to unknown road {id}")));
        }
        let dangling = self
            .signals
            .iter()
            .find(|s| s.associated_road.as_ref().is_some_and(|r| !self.index.contains(r)));
        if let Some(signal) = dangling {
            return Err(inconsistency(format!(
                "signal {} refers to unknown road {:?}",
                signal.source_id, signal.associated_road
            )));
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn inconsistency(msg: String) -> EngineError {
    log::error!("[RoadEngine] {msg}");
    EngineError::IndexInconsistency(msg)
}

fn build_one(way: &RawWay) -> Built {
    build_road_segment_with_warnings(&way.id, &way.points, &way.tags)
}

/// Segment construction for every way, results in input order.
///
/// With the `parallel` Cargo feature this runs on Rayon's thread pool;
/// construction has no cross-way dependency.
fn build_all(ways: &[RawWay]) -> Vec<Built> {
    #[cfg(not(feature = "parallel"))]
    {
        ways.iter().map(build_one).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        ways.par_iter().map(build_one).collect()
    }
}
