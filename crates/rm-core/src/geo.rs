//! Geographic coordinate type and distance math.
//!
//! Two distance models coexist on purpose:
//!
//! - **Coordinate space**: plain Euclidean distance in degrees, converted
//!   to metres with a flat `111 320 m/deg` factor.  Used by the spatial index
//!   for candidate narrowing.  Valid only at campus/metro scale and away from
//!   the poles; longitude degrees are not scaled by `cos(lat)`.
//! - **Great circle**: haversine on a sphere of radius 6 371 km.  Used for
//!   polyline length, which must be true distance.

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metres per degree at the equator (flat approximation).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 coordinate, stored as `(lon, lat)` in double precision.
///
/// Longitude comes first to match the `(x, y)` convention of map sources and
/// the R-tree envelope layout.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance to `other` in metres.
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        haversine_distance(self.lon, self.lat, other.lon, other.lat)
    }

    /// `true` if both components are finite (no NaN / ±inf).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

// ── BBox ──────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in longitude/latitude space.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    /// Smallest box covering every point in a single scan.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = BBox::new(first.lon, first.lat, first.lon, first.lat);
        for p in &points[1..] {
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
        }
        Some(bbox)
    }

    /// Square box of half-width `radius_deg` centred on `center`.
    pub fn around(center: GeoPoint, radius_deg: f64) -> Self {
        BBox::new(
            center.lon - radius_deg,
            center.lat - radius_deg,
            center.lon + radius_deg,
            center.lat + radius_deg,
        )
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lon >= self.min_lon && p.lon <= self.max_lon && p.lat >= self.min_lat && p.lat <= self.max_lat
    }

    /// `true` if the two boxes overlap or touch.
    #[inline]
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    #[inline]
    pub fn lower(&self) -> [f64; 2] {
        [self.min_lon, self.min_lat]
    }

    #[inline]
    pub fn upper(&self) -> [f64; 2] {
        [self.max_lon, self.max_lat]
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Euclidean distance in coordinate space (degrees) from `(px, py)` to the
/// closest point of segment `(x1, y1)-(x2, y2)`.
///
/// Projects onto the infinite line, clamps the parameter to `[0, 1]`, then
/// measures to the clamped point.  A zero-length segment degrades to
/// point-to-point distance.
pub fn point_to_segment_distance(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        let ex = px - x1;
        let ey = py - y1;
        return (ex * ex + ey * ey).sqrt();
    }

    let t = (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = x1 + t * dx;
    let cy = y1 + t * dy;
    let ex = px - cx;
    let ey = py - cy;
    (ex * ex + ey * ey).sqrt()
}

/// Minimum coordinate-space distance (degrees) from `point` to any
/// consecutive pair of `positions`.
///
/// A single position is treated as a degenerate segment; an empty slice
/// yields `f64::INFINITY`.
pub fn point_to_polyline_distance(point: GeoPoint, positions: &[GeoPoint]) -> f64 {
    match positions {
        [] => f64::INFINITY,
        [only] => point_to_segment_distance(point.lon, point.lat, only.lon, only.lat, only.lon, only.lat),
        _ => positions
            .windows(2)
            .map(|w| point_to_segment_distance(point.lon, point.lat, w[0].lon, w[0].lat, w[1].lon, w[1].lat))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Haversine great-circle distance in metres.
pub fn haversine_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat * 0.5).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon * 0.5).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

#[inline]
pub fn degrees_to_meters(deg: f64) -> f64 {
    deg * METERS_PER_DEGREE
}

#[inline]
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// Sum of haversine distances over consecutive positions, in metres.
pub fn polyline_length(positions: &[GeoPoint]) -> f64 {
    positions
        .windows(2)
        .map(|w| w[0].distance_m(w[1]))
        .sum()
}
