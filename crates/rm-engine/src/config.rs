//! Engine configuration.

use rm_join::SyntheticPolicy;
use rm_traffic::LevelThresholds;

use crate::{EngineError, EngineResult};

/// Tunables for the join passes and traffic banding.
///
/// Usually built through [`RoadEngineBuilder`](crate::RoadEngineBuilder), or
/// deserialized from JSON with the `serde` feature; missing fields take the
/// defaults below.
///
/// | Field              | Default                         |
/// |--------------------|---------------------------------|
/// | `signal_radius_m`  | 25 m                            |
/// | `pci_radius_m`     | 50 m                            |
/// | `synthetic`        | disabled, ±10 jitter, [40, 95]  |
/// | `level_thresholds` | Heavy ≥ 400, Moderate ≥ 250, Light ≥ 150 veh/h |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Signal association radius.  Small enough that a signal snaps only to
    /// the road it sits on, not a nearby parallel one.
    pub signal_radius_m:  f64,

    /// PCI radius; survey points are often offset from the centreline.
    pub pci_radius_m:     f64,

    pub synthetic:        SyntheticPolicy,

    pub level_thresholds: LevelThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            signal_radius_m:  25.0,
            pci_radius_m:     50.0,
            synthetic:        SyntheticPolicy::default(),
            level_thresholds: LevelThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// # Errors
    ///
    /// [`EngineError::Config`] for a non-positive or non-finite radius, an
    /// invalid synthetic policy, or unordered level thresholds.
    pub fn validate(&self) -> EngineResult<()> {
        for (name, radius) in [("signal_radius_m", self.signal_radius_m), ("pci_radius_m", self.pci_radius_m)] {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(EngineError::Config(format!("{name} must be positive and finite, got {radius}")));
            }
        }
        if !self.synthetic.is_valid() {
            return Err(EngineError::Config(format!(
                "synthetic policy needs 0 <= min <= max <= 100 and jitter >= 0, got {:?}",
                self.synthetic
            )));
        }
        if !self.level_thresholds.is_ordered() {
            return Err(EngineError::Config(format!(
                "level thresholds must satisfy light <= moderate <= heavy, got {:?}",
                self.level_thresholds
            )));
        }
        Ok(())
    }
}
