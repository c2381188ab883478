//! R-tree spatial index over road segments.
//!
//! # Layout
//!
//! ```text
//! segments: Vec<RoadSegment>          indexed by SegmentIdx (insertion order)
//! by_id:    RoadId → SegmentIdx       exact lookup
//! tree:     RTree<SegmentEntry>       bbox envelope + SegmentIdx
//! ```
//!
//! The tree only shortlists candidates whose bbox overlaps the query square;
//! the exact answer is always decided by point-to-polyline distance over the
//! stored positions.  Distances are coordinate-space degrees converted with
//! the flat `111 320 m/deg` factor (see [`rm_core::geo`]).

use rstar::{AABB, RTree, RTreeObject};

use rm_core::{
    BBox, GeoPoint, RoadId, SegmentIdx, check_point, check_radius, degrees_to_meters,
    meters_to_degrees, point_to_polyline_distance,
};

use crate::metadata::RoadMetadata;
use crate::segment::{RoadKind, RoadSegment};
use crate::{SpatialError, SpatialResult};

#[cfg(feature = "fx-hash")]
type IdMap = rustc_hash::FxHashMap<RoadId, SegmentIdx>;
#[cfg(not(feature = "fx-hash"))]
type IdMap = std::collections::HashMap<RoadId, SegmentIdx>;

/// Distances closer than this (metres) count as a tie.
const TIE_EPSILON_M: f64 = 1e-9;

/// Relative padding of the query square so envelopes lying exactly on the
/// radius are not lost to degree/metre rounding.
const ENVELOPE_PAD: f64 = 1e-9;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct SegmentEntry {
    envelope: AABB<[f64; 2]>,
    idx:      SegmentIdx,
}

impl SegmentEntry {
    fn new(segment: &RoadSegment, idx: SegmentIdx) -> Self {
        Self {
            envelope: AABB::from_corners(segment.bbox.lower(), segment.bbox.upper()),
            idx,
        }
    }
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

// ── RoadMatch ─────────────────────────────────────────────────────────────────

/// A segment returned by a point query, with its exact distance.
#[derive(Copy, Clone, Debug)]
pub struct RoadMatch<'a> {
    pub segment:    &'a RoadSegment,
    pub idx:        SegmentIdx,
    pub distance_m: f64,
}

/// Order matches nearest first.  Distances within [`TIE_EPSILON_M`] of a
/// run's closest member form one tie run, ordered by insertion index.
fn rank(matches: &mut [RoadMatch<'_>]) {
    matches.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m).then(a.idx.cmp(&b.idx)));
    let mut start = 0;
    while start < matches.len() {
        let anchor = matches[start].distance_m;
        let end = matches[start..]
            .iter()
            .position(|m| m.distance_m - anchor > TIE_EPSILON_M)
            .map_or(matches.len(), |offset| start + offset);
        matches[start..end].sort_by_key(|m| m.idx);
        start = end;
    }
}

// ── RoadIndex ─────────────────────────────────────────────────────────────────

/// Road segments keyed by id plus an R-tree over their bounding boxes.
///
/// `Send + Sync` with no interior mutability: build it once through
/// `&mut self`, then share it for concurrent reads.
pub struct RoadIndex {
    segments: Vec<RoadSegment>,
    by_id:    IdMap,
    tree:     RTree<SegmentEntry>,
}

impl RoadIndex {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            by_id:    IdMap::default(),
            tree:     RTree::new(),
        }
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Add a segment to the store and the tree.
    ///
    /// # Errors
    ///
    /// [`SpatialError::DuplicateRoad`] if a segment with the same id exists;
    /// the index is left unchanged.
    pub fn insert(&mut self, segment: RoadSegment) -> SpatialResult<SegmentIdx> {
        let idx = self.push(segment)?;
        self.tree.insert(SegmentEntry::new(&self.segments[idx.index()], idx));
        Ok(idx)
    }

    /// Insert many segments in iteration order.
    ///
    /// When the index is empty the tree is bulk-loaded (O(n log n), better
    /// packed than n inserts).  Duplicates are rejected individually and
    /// returned; they never abort the batch.
    pub fn extend<I>(&mut self, segments: I) -> Vec<SpatialError>
    where
        I: IntoIterator<Item = RoadSegment>,
    {
        let bulk = self.tree.size() == 0;
        let first_new = self.segments.len();
        let mut rejected = Vec::new();

        for segment in segments {
            if let Err(e) = self.push(segment) {
                rejected.push(e);
            }
        }

        let entries = self.segments[first_new..]
            .iter()
            .enumerate()
            .map(|(i, s)| SegmentEntry::new(s, SegmentIdx((first_new + i) as u32)));

        if bulk {
            self.tree = RTree::bulk_load(entries.collect());
        } else {
            for entry in entries.collect::<Vec<_>>() {
                self.tree.insert(entry);
            }
        }
        rejected
    }

    /// Drop every segment.  Used for wholesale reload.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.by_id.clear();
        self.tree = RTree::new();
    }

    /// Mutable access to a segment's metadata, the only mutable part of a
    /// segment once indexed.
    pub fn metadata_mut(&mut self, id: &RoadId) -> Option<&mut RoadMetadata> {
        let idx = *self.by_id.get(id)?;
        Some(&mut self.segments[idx.index()].metadata)
    }

    pub fn metadata_mut_at(&mut self, idx: SegmentIdx) -> Option<&mut RoadMetadata> {
        self.segments.get_mut(idx.index()).map(|s| &mut s.metadata)
    }

    /// Every segment's metadata in insertion order, with the kind alongside
    /// for classification-based policies.
    pub fn metadata_iter_mut(&mut self) -> impl Iterator<Item = (SegmentIdx, &RoadKind, &mut RoadMetadata)> {
        self.segments.iter_mut().enumerate().map(|(i, s)| {
            let RoadSegment { kind, metadata, .. } = s;
            (SegmentIdx(i as u32), &*kind, metadata)
        })
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn get(&self, id: &RoadId) -> Option<&RoadSegment> {
        self.by_id.get(id).map(|idx| &self.segments[idx.index()])
    }

    pub fn get_at(&self, idx: SegmentIdx) -> Option<&RoadSegment> {
        self.segments.get(idx.index())
    }

    pub fn idx_of(&self, id: &RoadId) -> Option<SegmentIdx> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &RoadId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Segments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RoadSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of entries in the coarse structure.  Equal to [`len`](Self::len)
    /// whenever the index is consistent.
    pub fn tree_size(&self) -> usize {
        self.tree.size()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest segment strictly closer than `max_distance_m` to `(lon, lat)`.
    ///
    /// Candidates within 1e-9 m of the closest distance resolve to
    /// the earliest-inserted one, independent of tree order.  Returns
    /// `Ok(None)` on an empty index or when nothing is in range.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidQuery`] for non-finite coordinates or a
    /// negative / non-finite radius.
    pub fn nearest(&self, lon: f64, lat: f64, max_distance_m: f64) -> SpatialResult<Option<RoadMatch<'_>>> {
        let point = check_point(GeoPoint::new(lon, lat))?;
        let max_m = check_radius(max_distance_m)?;

        let mut matches = self.candidates(point, max_m);
        matches.retain(|m| m.distance_m < max_m);
        let Some(closest) = matches.iter().map(|m| m.distance_m).min_by(f64::total_cmp) else {
            return Ok(None);
        };
        Ok(matches
            .into_iter()
            .filter(|m| m.distance_m - closest <= TIE_EPSILON_M)
            .min_by_key(|m| m.idx))
    }

    /// All segments strictly closer than `max_distance_m`, nearest first
    /// (ties in insertion order).  The first entry is always the one
    /// [`nearest`](Self::nearest) returns.
    pub fn within(&self, lon: f64, lat: f64, max_distance_m: f64) -> SpatialResult<Vec<RoadMatch<'_>>> {
        let point = check_point(GeoPoint::new(lon, lat))?;
        let max_m = check_radius(max_distance_m)?;

        let mut matches = self.candidates(point, max_m);
        matches.retain(|m| m.distance_m < max_m);
        rank(&mut matches);
        Ok(matches)
    }

    /// Segments whose bbox intersects `bbox`, in insertion order.
    pub fn in_bbox(&self, bbox: &BBox) -> Vec<&RoadSegment> {
        let envelope = AABB::from_corners(bbox.lower(), bbox.upper());
        let mut hits: Vec<SegmentIdx> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.idx)
            .collect();
        hits.sort_unstable();
        hits.into_iter().map(|idx| &self.segments[idx.index()]).collect()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn push(&mut self, segment: RoadSegment) -> SpatialResult<SegmentIdx> {
        if self.by_id.contains_key(&segment.id) {
            return Err(SpatialError::DuplicateRoad(segment.id));
        }
        let idx = SegmentIdx(self.segments.len() as u32);
        self.by_id.insert(segment.id.clone(), idx);
        self.segments.push(segment);
        Ok(idx)
    }

    /// Bbox-overlap shortlist with exact distances attached.  May include
    /// segments beyond the radius.
    fn candidates(&self, point: GeoPoint, max_m: f64) -> Vec<RoadMatch<'_>> {
        let radius_deg = meters_to_degrees(max_m) * (1.0 + ENVELOPE_PAD) + f64::EPSILON;
        let query = BBox::around(point, radius_deg);
        let envelope = AABB::from_corners(query.lower(), query.upper());

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| {
                let segment = &self.segments[entry.idx.index()];
                RoadMatch {
                    segment,
                    idx: entry.idx,
                    distance_m: degrees_to_meters(point_to_polyline_distance(point, &segment.positions)),
                }
            })
            .collect()
    }
}

impl Default for RoadIndex {
    fn default() -> Self {
        Self::new()
    }
}
