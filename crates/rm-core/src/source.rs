//! Raw map-network input handed over by the data-loading collaborator.
//!
//! These types carry no derived data and no validation; segment construction
//! in `rm-spatial` and the joiners in `rm-join` decide what is usable.

use std::collections::HashMap;

use crate::GeoPoint;

/// Free-form `key → value` tag mapping as found on map elements.
pub type Tags = HashMap<String, String>;

/// A tagged polyline representing a road.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawWay {
    /// Source identifier (numeric or string, as the source spells it).
    pub id: String,
    /// Ordered `(lon, lat)` geometry.
    pub points: Vec<GeoPoint>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
}

impl RawWay {
    pub fn new(id: impl Into<String>, points: Vec<GeoPoint>) -> Self {
        Self { id: id.into(), points, tags: Tags::new() }
    }

    /// Builder-style tag insertion, mostly for fixtures.
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// A tagged point feature (traffic signal, survey point, ...).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawNode {
    pub id: String,
    pub location: GeoPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
}

impl RawNode {
    pub fn new(id: impl Into<String>, location: GeoPoint) -> Self {
        Self { id: id.into(), location, tags: Tags::new() }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// `true` for `highway=traffic_signals` nodes.
    pub fn is_traffic_signal(&self) -> bool {
        self.tag("highway") == Some("traffic_signals")
    }
}

/// Ways plus pre-filtered point features from one source pass.
#[derive(Clone, Debug, Default)]
pub struct SourceData {
    pub ways:  Vec<RawWay>,
    pub nodes: Vec<RawNode>,
}
