//! Fluent builder for constructing a [`RoadEngine`].

use rm_core::RawWay;
use rm_join::SyntheticPolicy;
use rm_traffic::LevelThresholds;

use crate::{EngineConfig, EngineResult, LoadReport, RoadEngine};

/// Fluent builder for [`RoadEngine`].
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                        |
/// |-------------------------|--------------------------------|
/// | `.config(c)`            | `EngineConfig::default()`      |
/// | `.signal_radius_m(m)`   | 25 m                           |
/// | `.pci_radius_m(m)`      | 50 m                           |
/// | `.synthetic(policy)`    | disabled                       |
/// | `.level_thresholds(t)`  | 400 / 250 / 150 veh/h          |
/// | `.network(ways)`        | empty index                    |
///
/// Individual setters override the matching field of `.config(..)` no matter
/// the call order.
///
/// # Example
///
/// ```rust,ignore
/// let engine = RoadEngineBuilder::new()
///     .signal_radius_m(20.0)
///     .synthetic(SyntheticPolicy::enabled_with_seed(42))
///     .network(source.ways)
///     .build()?;
/// ```
#[derive(Default)]
pub struct RoadEngineBuilder {
    config:           Option<EngineConfig>,
    signal_radius_m:  Option<f64>,
    pci_radius_m:     Option<f64>,
    synthetic:        Option<SyntheticPolicy>,
    level_thresholds: Option<LevelThresholds>,
    network:          Option<Vec<RawWay>>,
}

impl RoadEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a full configuration (e.g. one loaded from JSON).
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn signal_radius_m(mut self, radius_m: f64) -> Self {
        self.signal_radius_m = Some(radius_m);
        self
    }

    pub fn pci_radius_m(mut self, radius_m: f64) -> Self {
        self.pci_radius_m = Some(radius_m);
        self
    }

    pub fn synthetic(mut self, policy: SyntheticPolicy) -> Self {
        self.synthetic = Some(policy);
        self
    }

    pub fn level_thresholds(mut self, thresholds: LevelThresholds) -> Self {
        self.level_thresholds = Some(thresholds);
        self
    }

    /// Ways to load during [`build`](Self::build).
    pub fn network(mut self, ways: Vec<RawWay>) -> Self {
        self.network = Some(ways);
        self
    }

    /// Validate the configuration and return a ready engine.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`](crate::EngineError::Config) if the resolved
    /// configuration fails [`EngineConfig::validate`].
    pub fn build(self) -> EngineResult<RoadEngine> {
        self.build_with_report().map(|(engine, _)| engine)
    }

    /// Like [`build`](Self::build) but also returns the report of the
    /// initial network load.  The report is empty when no network was given.
    pub fn build_with_report(self) -> EngineResult<(RoadEngine, LoadReport)> {
        let mut config = self.config.unwrap_or_default();
        if let Some(r) = self.signal_radius_m {
            config.signal_radius_m = r;
        }
        if let Some(r) = self.pci_radius_m {
            config.pci_radius_m = r;
        }
        if let Some(p) = self.synthetic {
            config.synthetic = p;
        }
        if let Some(t) = self.level_thresholds {
            config.level_thresholds = t;
        }
        config.validate()?;

        let mut engine = RoadEngine::with_config(config);
        let report = match self.network {
            Some(ways) => engine.load_network(&ways),
            None => LoadReport::default(),
        };
        Ok((engine, report))
    }
}
