//! Road segment model and construction from raw way data.
//!
//! A [`RoadSegment`] is built once from a single source way.  Everything
//! except [`RoadSegment::metadata`] is derived at construction and never
//! changes afterwards; the index only hands out `&RoadSegment` plus
//! `&mut RoadMetadata`.

use rm_core::{BBox, GeoPoint, RawWay, RoadId, Tags, polyline_length};

use crate::metadata::{MalformedTag, RoadMetadata};
use crate::{SpatialError, SpatialResult};

// ── RoadKind ──────────────────────────────────────────────────────────────────

/// Road classification from the `highway` tag.
///
/// Open enumeration: values without a dedicated variant are kept verbatim in
/// [`RoadKind::Other`], so `as_str` always returns what the source said.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadKind {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    LivingStreet,
    Service,
    Unclassified,
    Other(String),
}

impl RoadKind {
    pub fn from_tag(highway: &str) -> Self {
        match highway.trim() {
            "motorway"      => RoadKind::Motorway,
            "trunk"         => RoadKind::Trunk,
            "primary"       => RoadKind::Primary,
            "secondary"     => RoadKind::Secondary,
            "tertiary"      => RoadKind::Tertiary,
            "residential"   => RoadKind::Residential,
            "living_street" => RoadKind::LivingStreet,
            "service"       => RoadKind::Service,
            "unclassified"  => RoadKind::Unclassified,
            other           => RoadKind::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoadKind::Motorway     => "motorway",
            RoadKind::Trunk        => "trunk",
            RoadKind::Primary      => "primary",
            RoadKind::Secondary    => "secondary",
            RoadKind::Tertiary     => "tertiary",
            RoadKind::Residential  => "residential",
            RoadKind::LivingStreet => "living_street",
            RoadKind::Service      => "service",
            RoadKind::Unclassified => "unclassified",
            RoadKind::Other(s)     => s,
        }
    }

    /// The kind a `*_link` ramp belongs to (`primary_link` → `Primary`).
    /// Non-link kinds return themselves.
    pub fn base(&self) -> RoadKind {
        match self {
            RoadKind::Other(s) => match s.strip_suffix("_link") {
                Some(parent) => RoadKind::from_tag(parent),
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Motorway through secondary, including their link ramps.
    pub fn is_major(&self) -> bool {
        matches!(
            self.base(),
            RoadKind::Motorway | RoadKind::Trunk | RoadKind::Primary | RoadKind::Secondary
        )
    }
}

impl std::fmt::Display for RoadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RoadSegment ───────────────────────────────────────────────────────────────

/// One contiguous stretch of road derived from a single source way.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSegment {
    pub id:        RoadId,
    pub name:      String,
    pub kind:      RoadKind,
    /// Path-ordered `(lon, lat)` positions; always at least two.
    pub positions: Vec<GeoPoint>,
    pub bbox:      BBox,
    /// Haversine length in metres.
    pub length_m:  f64,
    /// `positions[len / 2]`: vertex-count midpoint, not the distance midpoint.
    pub midpoint:  GeoPoint,
    pub metadata:  RoadMetadata,
    /// Set when `name` came from a non-blank `name` tag.
    named:         bool,
}

impl RoadSegment {
    /// `true` if the segment was created from the `name` tag rather than the
    /// classification placeholder.
    pub fn is_named(&self) -> bool {
        self.named
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

/// Build a segment from raw way parts.
///
/// # Errors
///
/// [`SpatialError::InvalidGeometry`] when fewer than two points are given or
/// any point is non-finite.  Malformed numeric tags never fail construction;
/// they are logged at `debug` and the field is left unset.
pub fn build_road_segment(way_id: &str, points: &[GeoPoint], tags: &Tags) -> SpatialResult<RoadSegment> {
    let (segment, malformed) = build_road_segment_with_warnings(way_id, points, tags)?;
    for tag in &malformed {
        log::debug!(
            "[RoadSegment] way {way_id}: ignoring malformed {}={:?}",
            tag.key,
            tag.value
        );
    }
    Ok(segment)
}

/// Like [`build_road_segment`] but hands the malformed tags back to the caller
/// instead of logging them.
pub fn build_road_segment_with_warnings(
    way_id: &str,
    points: &[GeoPoint],
    tags:   &Tags,
) -> SpatialResult<(RoadSegment, Vec<MalformedTag>)> {
    if points.len() < 2 {
        return Err(SpatialError::InvalidGeometry {
            way_id: way_id.to_owned(),
            reason: format!("{} point(s), need at least 2", points.len()),
        });
    }
    if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
        return Err(SpatialError::InvalidGeometry {
            way_id: way_id.to_owned(),
            reason: format!("non-finite coordinate {bad}"),
        });
    }

    // Non-empty, checked above.
    let bbox = BBox::from_points(points).ok_or_else(|| SpatialError::InvalidGeometry {
        way_id: way_id.to_owned(),
        reason: "empty geometry".to_owned(),
    })?;

    let kind = tags
        .get("highway")
        .map(|h| RoadKind::from_tag(h))
        .unwrap_or(RoadKind::Unclassified);

    let tagged_name = tags
        .get("name")
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_owned);
    let named = tagged_name.is_some();
    let name = tagged_name.unwrap_or_else(|| placeholder_name(&kind));

    let (metadata, malformed) = RoadMetadata::from_tags(tags);

    let segment = RoadSegment {
        id: RoadId::from_way(way_id),
        name,
        kind,
        positions: points.to_vec(),
        bbox,
        length_m: polyline_length(points),
        midpoint: points[points.len() / 2],
        metadata,
        named,
    };
    Ok((segment, malformed))
}

impl TryFrom<&RawWay> for RoadSegment {
    type Error = SpatialError;

    fn try_from(way: &RawWay) -> SpatialResult<Self> {
        build_road_segment(&way.id, &way.points, &way.tags)
    }
}

fn placeholder_name(kind: &RoadKind) -> String {
    format!("Unnamed {kind} road")
}
