//! `rm-traffic` — current traffic snapshots keyed by road.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`metrics`] | `TrafficMetrics`, `TrafficLevel`, `LevelThresholds`             |
//! | [`store`]   | `TrafficStore`: `RwLock`-guarded snapshots + signal counts     |
//! | [`error`]   | `TrafficError`, `TrafficResult<T>`                              |
//!
//! # Ownership of fields
//!
//! Volumes, forecasts and the level belong to the metrics producer and are
//! replaced wholesale by [`TrafficStore::set`].  `signal_count` belongs to
//! the signal joiner; the store keeps it beside the snapshots and stamps it
//! onto every snapshot it hands out, so a producer overwrite never resets it.

pub mod error;
pub mod metrics;
pub mod store;


pub use error::{TrafficError, TrafficResult};
pub use metrics::{LevelThresholds, TrafficLevel, TrafficMetrics};
pub use store::TrafficStore;
