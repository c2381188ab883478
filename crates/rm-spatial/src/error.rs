//! Spatial-subsystem error type.

use thiserror::Error;

use rm_core::{CoreError, RoadId};

/// Errors produced by `rm-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("way {way_id}: invalid geometry ({reason})")]
    InvalidGeometry { way_id: String, reason: String },

    #[error("road {0} is already indexed")]
    DuplicateRoad(RoadId),

    #[error("invalid query: {0}")]
    InvalidQuery(#[from] CoreError),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),

    #[cfg(feature = "overpass")]
    #[error("Overpass JSON error: {0}")]
    Overpass(#[from] serde_json::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
