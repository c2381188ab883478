//! The `TrafficStore` — one snapshot per road plus the joiner's signal tally.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rm_core::RoadId;

use crate::{TrafficError, TrafficLevel, TrafficMetrics, TrafficResult};

#[derive(Default)]
struct Inner {
    /// Producer snapshots; overwritten on every `set`.
    snapshots:     HashMap<RoadId, TrafficMetrics>,
    /// Signals associated per road.  Sparse: only roads with ≥ 1 signal.
    signal_counts: HashMap<RoadId, u32>,
}

/// Keyed traffic snapshots, safe to read from many threads while one writes.
///
/// Every method takes `&self`; mutation goes through the internal `RwLock`.
/// The store does not know which roads exist; the engine checks ids against
/// the index before writing.
#[derive(Default)]
pub struct TrafficStore {
    inner: RwLock<Inner>,
}

impl TrafficStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    /// Overwrite the snapshot for `road`, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`TrafficError::NegativeVolume`] if `metrics` fails validation; the
    /// stored snapshot is unchanged.
    pub fn set(&self, road: RoadId, mut metrics: TrafficMetrics) -> TrafficResult<Option<TrafficMetrics>> {
        metrics.validate()?;
        let mut inner = self.write()?;
        metrics.signal_count = inner.signal_counts.get(&road).copied().unwrap_or(0);
        Ok(inner.snapshots.insert(road, metrics))
    }

    /// Copy of the current snapshot with the live signal count, or `None`
    /// if no producer has written one.
    pub fn get(&self, road: &RoadId) -> TrafficResult<Option<TrafficMetrics>> {
        let inner = self.read()?;
        Ok(inner.snapshots.get(road).map(|m| {
            let mut snapshot = m.clone();
            snapshot.signal_count = inner.signal_counts.get(road).copied().unwrap_or(0);
            snapshot
        }))
    }

    pub fn contains(&self, road: &RoadId) -> TrafficResult<bool> {
        Ok(self.read()?.snapshots.contains_key(road))
    }

    /// Number of roads with a snapshot.
    pub fn len(&self) -> TrafficResult<usize> {
        Ok(self.read()?.snapshots.len())
    }

    pub fn is_empty(&self) -> TrafficResult<bool> {
        Ok(self.read()?.snapshots.is_empty())
    }

    /// Roads whose current snapshot is at `level`, sorted by id.
    pub fn roads_with_level(&self, level: TrafficLevel) -> TrafficResult<Vec<RoadId>> {
        let inner = self.read()?;
        let mut ids: Vec<RoadId> = inner
            .snapshots
            .iter()
            .filter(|(_, m)| m.level == level)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Every road id the store holds data for (snapshot or signal count),
    /// sorted.
    pub fn road_ids(&self) -> TrafficResult<Vec<RoadId>> {
        let inner = self.read()?;
        let mut ids: Vec<RoadId> = inner
            .snapshots
            .keys()
            .chain(inner.signal_counts.keys().filter(|id| !inner.snapshots.contains_key(*id)))
            .cloned()
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    // ── Signal counts ─────────────────────────────────────────────────────

    /// Record one more signal on `road`; returns the new count.
    pub fn increment_signal_count(&self, road: &RoadId) -> TrafficResult<u32> {
        let mut inner = self.write()?;
        let count = inner.signal_counts.entry(road.clone()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    pub fn signal_count(&self, road: &RoadId) -> TrafficResult<u32> {
        Ok(self.read()?.signal_counts.get(road).copied().unwrap_or(0))
    }

    /// Sum of all per-road signal counts.
    pub fn total_signals(&self) -> TrafficResult<u64> {
        Ok(self.read()?.signal_counts.values().map(|&c| u64::from(c)).sum())
    }

    /// Drop every signal count, keeping the snapshots.  Used before a
    /// signal reload.
    pub fn clear_signal_counts(&self) -> TrafficResult<()> {
        self.write()?.signal_counts.clear();
        Ok(())
    }

    /// Drop everything.
    pub fn clear(&self) -> TrafficResult<()> {
        let mut inner = self.write()?;
        inner.snapshots.clear();
        inner.signal_counts.clear();
        Ok(())
    }

    // ── Lock helpers ──────────────────────────────────────────────────────

    fn read(&self) -> TrafficResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| {
            log::error!("[TrafficStore] read lock poisoned");
            TrafficError::LockPoisoned
        })
    }

    fn write(&self) -> TrafficResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| {
            log::error!("[TrafficStore] write lock poisoned");
            TrafficError::LockPoisoned
        })
    }
}
