use rm_spatial::SpatialError;
use rm_traffic::TrafficError;
use thiserror::Error;

use crate::SyntheticPolicy;

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("traffic store error: {0}")]
    Traffic(#[from] TrafficError),

    #[error("synthetic policy needs 0 <= min <= max <= 100 and jitter >= 0, got {0:?}")]
    InvalidPolicy(SyntheticPolicy),
}

pub type JoinResult<T> = Result<T, JoinError>;
