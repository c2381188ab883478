use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("{field} must be a finite non-negative volume, got {value}")]
    NegativeVolume { field: &'static str, value: f64 },

    #[error("traffic store lock poisoned by a panicking writer")]
    LockPoisoned,
}

pub type TrafficResult<T> = Result<T, TrafficError>;
