//! Load and diagnostics reports.

/// A source way that did not become a road segment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedWay {
    pub way_id: String,
    pub reason: String,
}

/// Outcome of [`RoadEngine::load_network`](crate::RoadEngine::load_network).
///
/// `loaded + skipped` equals the number of input ways.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadReport {
    pub loaded:         usize,
    pub skipped:        usize,
    /// One entry per skipped way, in input order.
    pub skipped_ways:   Vec<SkippedWay>,
    /// Tags on loaded ways whose value could not be parsed.
    pub malformed_tags: usize,
}

impl LoadReport {
    pub(crate) fn skip(&mut self, way_id: &str, reason: impl Into<String>) {
        self.skipped += 1;
        self.skipped_ways.push(SkippedWay { way_id: way_id.to_owned(), reason: reason.into() });
    }
}

/// Diagnostics snapshot from [`RoadEngine::stats`](crate::RoadEngine::stats).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineStats {
    pub road_count:         usize,
    /// Entries in the R-tree; equals `road_count` when consistent.
    pub index_size:         usize,
    pub traffic_data_count: usize,
    /// Signals loaded, associated or not.
    pub signal_count:       usize,
    pub orphaned_signals:   usize,
}
