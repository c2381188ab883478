//! Traffic snapshot type and volume-to-level banding.

use chrono::{DateTime, Utc};

use crate::{TrafficError, TrafficResult};

/// Congestion band for a road's current volume.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficLevel {
    Minimal,
    Light,
    Moderate,
    Heavy,
}

impl TrafficLevel {
    pub fn from_volume(volume: f64, thresholds: &LevelThresholds) -> Self {
        thresholds.classify(volume)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficLevel::Minimal  => "MINIMAL",
            TrafficLevel::Light    => "LIGHT",
            TrafficLevel::Moderate => "MODERATE",
            TrafficLevel::Heavy    => "HEAVY",
        }
    }
}

impl std::fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds (veh/h, inclusive) of each band above `Minimal`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelThresholds {
    pub heavy:    f64,
    pub moderate: f64,
    pub light:    f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self { heavy: 400.0, moderate: 250.0, light: 150.0 }
    }
}

impl LevelThresholds {
    pub fn classify(&self, volume: f64) -> TrafficLevel {
        if volume >= self.heavy {
            TrafficLevel::Heavy
        } else if volume >= self.moderate {
            TrafficLevel::Moderate
        } else if volume >= self.light {
            TrafficLevel::Light
        } else {
            TrafficLevel::Minimal
        }
    }

    /// `true` when all bounds are finite and `light <= moderate <= heavy`.
    pub fn is_ordered(&self) -> bool {
        [self.light, self.moderate, self.heavy].iter().all(|v| v.is_finite())
            && self.light <= self.moderate
            && self.moderate <= self.heavy
    }
}

/// Current and forecast volume for one road.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficMetrics {
    pub current_volume: f64,
    pub forecast_1h:    f64,
    pub forecast_4h:    f64,
    pub forecast_24h:   f64,
    pub level:          TrafficLevel,
    pub last_updated:   DateTime<Utc>,
    /// Filled in by the store from the signal joiner's tally; any value the
    /// producer puts here is ignored on `set`.
    pub signal_count:   u32,
}

impl TrafficMetrics {
    /// Snapshot stamped now, with `level` banded from `current_volume`.
    pub fn from_volumes(
        current_volume: f64,
        forecast_1h:    f64,
        forecast_4h:    f64,
        forecast_24h:   f64,
        thresholds:     &LevelThresholds,
    ) -> Self {
        Self {
            current_volume,
            forecast_1h,
            forecast_4h,
            forecast_24h,
            level: thresholds.classify(current_volume),
            last_updated: Utc::now(),
            signal_count: 0,
        }
    }

    /// # Errors
    ///
    /// [`TrafficError::NegativeVolume`] naming the first negative or
    /// non-finite volume field.
    pub fn validate(&self) -> TrafficResult<()> {
        let fields = [
            ("current_volume", self.current_volume),
            ("forecast_1h", self.forecast_1h),
            ("forecast_4h", self.forecast_4h),
            ("forecast_24h", self.forecast_24h),
        ];
        match fields.into_iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
            Some((field, value)) => Err(TrafficError::NegativeVolume { field, value }),
            None => Ok(()),
        }
    }
}
