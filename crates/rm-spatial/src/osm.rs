//! OSM PBF adapter — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use rm_spatial::osm::load_from_pbf;
//!
//! let source = load_from_pbf(Path::new("lee_county.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! Ways whose `highway` value is a road (see [`is_road`]) become [`RawWay`]s
//! with their node references resolved to coordinates.  Nodes tagged
//! `highway=traffic_signals` become [`RawNode`]s.  Everything else
//! (buildings, footways, relations) is ignored.
//!
//! # Memory note
//!
//! All node coordinates are buffered in a `HashMap<i64, GeoPoint>` during the
//! single pass, because ways reference nodes by integer id.  The map is
//! dropped before this function returns.

use std::collections::HashMap;
use std::path::Path;

use osmpbf::{Element, ElementReader};

use rm_core::{GeoPoint, RawNode, RawWay, SourceData, Tags};

use crate::SpatialError;

// ── Public entry point ────────────────────────────────────────────────────────

/// Read road ways and traffic-signal nodes from an OSM PBF file.
///
/// Way references that cannot be resolved are dropped from that way's
/// geometry; a way left with fewer than two points is still returned and is
/// rejected (and counted) by segment construction.
///
/// # Errors
///
/// Returns [`SpatialError::Osm`] on open or parse errors.
pub fn load_from_pbf(path: &Path) -> Result<SourceData, SpatialError> {
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut signals: Vec<RawNode> = Vec::new();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                let pos = GeoPoint::new(n.lon(), n.lat());
                all_nodes.insert(n.id(), pos);
                push_signal(&mut signals, n.id(), pos, n.tags());
            }
            Element::DenseNode(n) => {
                let pos = GeoPoint::new(n.lon(), n.lat());
                all_nodes.insert(n.id(), pos);
                push_signal(&mut signals, n.id(), pos, n.tags());
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Tags = w
                    .tags()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                if tags.get("highway").is_some_and(|h| is_road(h)) {
                    road_ways.push(OsmWay { id: w.id(), refs: w.refs().collect(), tags });
                }
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    let ways: Vec<RawWay> = road_ways
        .into_iter()
        .map(|w| RawWay {
            id:     w.id.to_string(),
            points: w.refs.iter().filter_map(|r| all_nodes.get(r).copied()).collect(),
            tags:   w.tags,
        })
        .collect();

    log::info!("[OsmLoader] {} road ways, {} signal nodes from {}", ways.len(), signals.len(), path.display());
    Ok(SourceData { ways, nodes: signals })
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    id:   i64,
    refs: Vec<i64>,
    tags: Tags,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

fn push_signal<'a>(out: &mut Vec<RawNode>, id: i64, pos: GeoPoint, tags: impl Iterator<Item = (&'a str, &'a str)>) {
    let tags: Vec<(&str, &str)> = tags.collect();
    if tags.iter().any(|(k, v)| *k == "highway" && *v == "traffic_signals") {
        out.push(RawNode {
            id:       id.to_string(),
            location: pos,
            tags:     tags.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect(),
        });
    }
}

/// `true` for `highway` values that describe a road carrying vehicles.
fn is_road(highway: &str) -> bool {
    !matches!(
        highway,
        "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track"
            | "bridleway" | "corridor" | "proposed" | "construction" | "platform"
    )
}
