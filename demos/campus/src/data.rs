//! Embedded fixtures: a small road network around a university campus in
//! Lee County, Florida, a pavement survey, and the engine configuration.

/// Overpass `out geom` response.  Way 106 has a single vertex and way 108
/// is a building outline; both are dropped before indexing.
pub const OVERPASS_JSON: &str = r#"{
  "version": 0.6,
  "generator": "Overpass API",
  "elements": [
    {"type": "way", "id": 101,
     "tags": {"highway": "primary", "name": "Ben Hill Griffin Pkwy", "lanes": "4", "maxspeed": "45 mph"},
     "geometry": [{"lat": 26.4550, "lon": -81.7780}, {"lat": 26.4634, "lon": -81.7780}, {"lat": 26.4750, "lon": -81.7781}]},
    {"type": "way", "id": 102,
     "tags": {"highway": "secondary", "name": "FGCU Blvd", "lanes": "2", "surface": "asphalt"},
     "geometry": [{"lat": 26.4634, "lon": -81.7780}, {"lat": 26.4634, "lon": -81.7715}, {"lat": 26.4633, "lon": -81.7650}]},
    {"type": "way", "id": 103,
     "tags": {"highway": "residential", "name": "Lake Pkwy"},
     "geometry": [{"lat": 26.4600, "lon": -81.7760}, {"lat": 26.4602, "lon": -81.7730}, {"lat": 26.4600, "lon": -81.7700}]},
    {"type": "way", "id": 104,
     "tags": {"highway": "service", "maxspeed": "signals"},
     "geometry": [{"lat": 26.4610, "lon": -81.7700}, {"lat": 26.4630, "lon": -81.7700}]},
    {"type": "way", "id": 105,
     "tags": {"highway": "tertiary", "name": "Treeline Ave"},
     "geometry": [{"lat": 26.4550, "lon": -81.7650}, {"lat": 26.4633, "lon": -81.7650}, {"lat": 26.4700, "lon": -81.7649}]},
    {"type": "way", "id": 106,
     "tags": {"highway": "residential", "name": "Stub Ct"},
     "geometry": [{"lat": 26.4580, "lon": -81.7720}]},
    {"type": "way", "id": 107,
     "tags": {"highway": "primary_link"},
     "geometry": [{"lat": 26.4640, "lon": -81.7779}, {"lat": 26.4645, "lon": -81.7770}]},
    {"type": "way", "id": 108,
     "tags": {"building": "university"},
     "geometry": [{"lat": 26.4620, "lon": -81.7740}, {"lat": 26.4625, "lon": -81.7735}]},
    {"type": "node", "id": 9001, "lat": 26.4634, "lon": -81.7780, "tags": {"highway": "traffic_signals"}},
    {"type": "node", "id": 9002, "lat": 26.4634, "lon": -81.7651, "tags": {"highway": "traffic_signals"}},
    {"type": "node", "id": 9003, "lat": 26.4800, "lon": -81.7500, "tags": {"highway": "traffic_signals"}},
    {"type": "node", "id": 9004, "lat": 26.4634, "lon": -81.7715, "tags": {"crossing": "marked"}}
  ]
}"#;

/// Pavement survey.  The last row is ~1 km from any road.
pub const PCI_CSV: &str = "\
lon,lat,pci,condition,inspection_date,surface
-81.7782,26.4600,82,Good,2024-03-18,asphalt
-81.7740,26.4636,58,,2023-11-02,
-81.7730,26.4598,44.5,Poor,2024-01-09,
-81.7680,26.4634,63,,2024-02-27,asphalt
-81.7600,26.4700,90,,,
";

/// Engine configuration; omitted fields take their defaults.
pub const CONFIG_JSON: &str = r#"{
  "signal_radius_m": 25.0,
  "pci_radius_m": 50.0,
  "synthetic": { "enabled": true, "seed": 42 }
}"#;
