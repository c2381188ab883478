//! Traffic-signal association.

use std::collections::HashMap;

use rm_core::{GeoPoint, RawNode, RoadId, SignalId, check_radius};
use rm_spatial::{RoadIndex, SpatialError};
use rm_traffic::TrafficStore;

use crate::JoinResult;

/// A traffic-control device and the road it was snapped to, if any.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficSignal {
    pub id:              SignalId,
    /// Node id as the source spelled it.
    pub source_id:       String,
    pub location:        GeoPoint,
    /// Nearest road within the association radius; `None` = orphaned.
    pub associated_road: Option<RoadId>,
    /// Distance to `associated_road` in metres.
    pub distance_m:      Option<f64>,
}

impl TrafficSignal {
    pub fn is_orphaned(&self) -> bool {
        self.associated_road.is_none()
    }
}

/// Counts from one [`associate_signals`] pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalLoadReport {
    pub loaded:     usize,
    pub associated: usize,
    pub orphaned:   usize,
}

// ── SignalRegistry ────────────────────────────────────────────────────────────

/// Every loaded signal, associated or not, indexed by [`SignalId`].
#[derive(Default)]
pub struct SignalRegistry {
    signals: Vec<TrafficSignal>,
    by_road: HashMap<RoadId, Vec<SignalId>>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, source_id: String, location: GeoPoint, hit: Option<(RoadId, f64)>) -> SignalId {
        let id = SignalId(self.signals.len() as u32);
        let (associated_road, distance_m) = match hit {
            Some((road, d)) => {
                self.by_road.entry(road.clone()).or_default().push(id);
                (Some(road), Some(d))
            }
            None => (None, None),
        };
        self.signals.push(TrafficSignal { id, source_id, location, associated_road, distance_m });
        id
    }

    pub fn get(&self, id: SignalId) -> Option<&TrafficSignal> {
        self.signals.get(id.index())
    }

    /// All signals in load order.
    pub fn iter(&self) -> impl Iterator<Item = &TrafficSignal> {
        self.signals.iter()
    }

    pub fn orphaned(&self) -> impl Iterator<Item = &TrafficSignal> {
        self.signals.iter().filter(|s| s.is_orphaned())
    }

    pub fn orphaned_count(&self) -> usize {
        self.orphaned().count()
    }

    /// Signals snapped to `road`, in load order.
    pub fn for_road(&self, road: &RoadId) -> Vec<&TrafficSignal> {
        self.by_road
            .get(road)
            .map(|ids| ids.iter().map(|id| &self.signals[id.index()]).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn clear(&mut self) {
        self.signals.clear();
        self.by_road.clear();
    }
}

// ── Association pass ──────────────────────────────────────────────────────────

/// Snap each node to its nearest road within `radius_m` and append it to
/// `registry`.
///
/// Associated signals increment the road's count in `traffic`.  Nodes with no
/// road in range, or with unusable coordinates, are kept as orphaned and
/// logged; they never abort the pass.
///
/// # Errors
///
/// [`JoinError::Spatial`](crate::JoinError::Spatial) for an invalid radius,
/// [`JoinError::Traffic`](crate::JoinError::Traffic) if the store lock is
/// poisoned.
pub fn associate_signals(
    index:    &RoadIndex,
    traffic:  &TrafficStore,
    registry: &mut SignalRegistry,
    nodes:    &[RawNode],
    radius_m: f64,
) -> JoinResult<SignalLoadReport> {
    check_radius(radius_m).map_err(SpatialError::from)?;

    let mut report = SignalLoadReport::default();
    for node in nodes {
        let hit = match index.nearest(node.location.lon, node.location.lat, radius_m) {
            Ok(found) => found.map(|m| (m.segment.id.clone(), m.distance_m)),
            Err(e) => {
                log::debug!("[SignalJoin] node {}: {e}", node.id);
                None
            }
        };

        report.loaded += 1;
        match &hit {
            Some((road, _)) => {
                traffic.increment_signal_count(road)?;
                report.associated += 1;
            }
            None => {
                log::debug!(
                    "[SignalJoin] node {} at {} has no road within {radius_m} m",
                    node.id,
                    node.location
                );
                report.orphaned += 1;
            }
        }
        registry.push(node.id.clone(), node.location, hit);
    }

    log::info!(
        "[SignalJoin] {} signals: {} associated, {} orphaned",
        report.loaded,
        report.associated,
        report.orphaned
    );
    if report.orphaned > 0 {
        log::warn!("[SignalJoin] {} signal(s) left orphaned at {radius_m} m", report.orphaned);
    }
    Ok(report)
}
