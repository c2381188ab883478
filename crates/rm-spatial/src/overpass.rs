//! Overpass JSON adapter — enabled with the `overpass` Cargo feature.
//!
//! Expects the output of an `out geom;` query, where every way carries its
//! own inline `geometry` array:
//!
//! ```json
//! {"elements": [
//!   {"type": "way", "id": 42, "tags": {"highway": "primary"},
//!    "geometry": [{"lat": 26.46, "lon": -81.77}, {"lat": 26.47, "lon": -81.77}]},
//!   {"type": "node", "id": 7, "lat": 26.46, "lon": -81.77,
//!    "tags": {"highway": "traffic_signals"}}
//! ]}
//! ```
//!
//! Only ways with a `highway` tag are kept.  Nodes are kept when tagged
//! `highway=traffic_signals`; untagged geometry nodes are ignored.  Ways are
//! passed through without geometry validation; short ways are rejected
//! later by segment construction, where they are counted.

use std::collections::HashMap;

use serde::Deserialize;

use rm_core::{GeoPoint, RawNode, RawWay, SourceData};

use crate::SpatialResult;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum OverpassElement {
    #[serde(rename = "node")]
    Node {
        id:  u64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    #[serde(rename = "way")]
    Way {
        id: u64,
        #[serde(default)]
        geometry: Vec<LatLon>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

/// Parse an Overpass `out geom` response into raw ways and signal nodes.
///
/// # Errors
///
/// [`SpatialError::Overpass`](crate::SpatialError::Overpass) when the text is
/// not valid Overpass JSON.
pub fn parse_overpass_json(json: &str) -> SpatialResult<SourceData> {
    let response: OverpassResponse = serde_json::from_str(json)?;

    let mut data = SourceData::default();
    for element in response.elements {
        match element {
            OverpassElement::Way { id, geometry, tags } if tags.contains_key("highway") => {
                data.ways.push(RawWay {
                    id: id.to_string(),
                    points: geometry.into_iter().map(|p| GeoPoint::new(p.lon, p.lat)).collect(),
                    tags,
                });
            }
            OverpassElement::Node { id, lat, lon, tags } => {
                let node = RawNode { id: id.to_string(), location: GeoPoint::new(lon, lat), tags };
                if node.is_traffic_signal() {
                    data.nodes.push(node);
                }
            }
            _ => {}
        }
    }

    log::info!(
        "[Overpass] parsed {} highway ways, {} signal nodes",
        data.ways.len(),
        data.nodes.len()
    );
    Ok(data)
}
