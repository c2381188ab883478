//! `rm-engine` — road matching facade for the roadmatch workspace.
//!
//! # Pipeline
//!
//! ```text
//! RawWay[]  ──load_network──▶  RoadIndex (R-tree + id map)
//!                                  │
//! RawNode[] ──load_signals──▶  nearest(25 m) ──▶ SignalRegistry + TrafficStore counts
//! PciRecord[] ──join_pci────▶  nearest(50 m) ──▶ RoadMetadata.pci
//!                 fill_synthetic_pci (opt-in) ──▶ RoadMetadata.pci, synthetic = true
//! producer ──set_traffic_data──────────────────▶ TrafficStore snapshots
//! ```
//!
//! Callers then read roads by id, by point (`find_nearest_road`,
//! `roads_near`) or by box (`roads_in_bbox`), with traffic and signal data
//! looked up by [`RoadId`](rm_core::RoadId).
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Segment construction in `load_network` runs on Rayon.      |
//! | `fx-hash`  | FxHash for the road id map.                                |
//! | `serde`    | Serialize/Deserialize on `EngineConfig` and all reports.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rm_engine::RoadEngineBuilder;
//!
//! let mut engine = RoadEngineBuilder::new().network(source.ways).build()?;
//! engine.load_signals(&source.nodes)?;
//! if let Some(road) = engine.find_nearest_road(-81.7745, 26.4634, 30.0)? {
//!     println!("{} ({})", road.name, road.kind);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;

#[cfg(test)]
mod tests;

pub use builder::RoadEngineBuilder;
pub use config::EngineConfig;
pub use engine::RoadEngine;
pub use error::{EngineError, EngineResult};
pub use report::{EngineStats, LoadReport, SkippedWay};
