use rm_core::RoadId;
use rm_join::JoinError;
use rm_spatial::SpatialError;
use rm_traffic::TrafficError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("road {0} is not in the index")]
    UnknownRoad(RoadId),

    #[error("index inconsistency: {0}")]
    IndexInconsistency(String),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("join error: {0}")]
    Join(#[from] JoinError),

    #[error("traffic store error: {0}")]
    Traffic(#[from] TrafficError),
}

pub type EngineResult<T> = Result<T, EngineError>;
