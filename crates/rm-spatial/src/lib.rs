//! `rm-spatial` — road segments, spatial indexing, and map-source adapters.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`segment`]  | `RoadSegment`, `RoadKind`, `build_road_segment`                |
//! | [`metadata`] | `RoadMetadata`, `PciCondition`, `MaintenancePriority`, tag parsing |
//! | [`index`]    | `RoadIndex` (R-tree + id map), `RoadMatch`                     |
//! | [`overpass`] | `parse_overpass_json` (feature = `"overpass"` only)            |
//! | [`osm`]      | `load_from_pbf` (feature = `"osm"` only)                       |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `overpass` | Overpass `out geom` JSON parsing via `serde_json`.        |
//! | `osm`      | OSM PBF loading via the `osmpbf` crate.                   |
//! | `fx-hash`  | FxHash for the id map.                                    |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.        |

pub mod error;
pub mod index;
pub mod metadata;
pub mod segment;

#[cfg(feature = "overpass")]
pub mod overpass;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{SpatialError, SpatialResult};
pub use index::{RoadIndex, RoadMatch};
pub use metadata::{MaintenancePriority, MalformedTag, PciCondition, RoadMetadata};
pub use segment::{RoadKind, RoadSegment, build_road_segment, build_road_segment_with_warnings};
