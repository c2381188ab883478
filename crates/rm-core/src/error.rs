//! Workspace base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need it.

use thiserror::Error;

use crate::GeoPoint;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("non-finite coordinate {0}")]
    NonFiniteCoordinate(GeoPoint),

    #[error("invalid radius {0} m: must be finite and non-negative")]
    InvalidRadius(f64),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Reject NaN / infinite query coordinates.
pub fn check_point(p: GeoPoint) -> CoreResult<GeoPoint> {
    if p.is_finite() { Ok(p) } else { Err(CoreError::NonFiniteCoordinate(p)) }
}

/// Reject negative or non-finite search radii.
pub fn check_radius(radius_m: f64) -> CoreResult<f64> {
    if radius_m.is_finite() && radius_m >= 0.0 {
        Ok(radius_m)
    } else {
        Err(CoreError::InvalidRadius(radius_m))
    }
}
