//! `rm-core` — foundational types for the `roadmatch` workspace.
//!
//! This crate is a dependency of every other `rm-*` crate.  It has no `rm-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `RoadId`, `SegmentIdx`, `SignalId`                         |
//! | [`geo`]     | `GeoPoint`, `BBox`, haversine and point-to-segment math    |
//! | [`source`]  | `RawWay`, `RawNode`, `SourceData`: raw map-network input  |
//! | [`rng`]     | `SegmentRng` (per-segment deterministic RNG)               |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod source;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult, check_point, check_radius};
pub use geo::{
    BBox, EARTH_RADIUS_M, GeoPoint, METERS_PER_DEGREE, degrees_to_meters, haversine_distance,
    meters_to_degrees, point_to_polyline_distance, point_to_segment_distance, polyline_length,
};
pub use ids::{RoadId, SegmentIdx, SignalId};
pub use rng::SegmentRng;
pub use source::{RawNode, RawWay, SourceData, Tags};
