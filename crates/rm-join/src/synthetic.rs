//! Synthetic PCI fill for roads the survey did not reach.
//!
//! Fabricated scores are a demo convenience for sparse datasets.  The policy
//! is disabled unless a caller turns it on, and every filled road carries
//! `synthetic = true` so consumers can tell measured from made-up values.

use rm_core::SegmentRng;
use rm_spatial::{PciCondition, RoadIndex, RoadKind};

use crate::{JoinError, JoinResult};

/// Controls [`fill_synthetic_pci`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SyntheticPolicy {
    pub enabled: bool,
    /// Mixed with each segment's insertion index; see [`SegmentRng`].
    pub seed:    u64,
    /// Uniform jitter amplitude in PCI points.
    pub jitter:  f64,
    pub min:     f64,
    pub max:     f64,
}

impl Default for SyntheticPolicy {
    fn default() -> Self {
        Self { enabled: false, seed: 0, jitter: 10.0, min: 40.0, max: 95.0 }
    }
}

impl SyntheticPolicy {
    /// Enabled copy with the given seed.
    pub fn enabled_with_seed(seed: u64) -> Self {
        Self { enabled: true, seed, ..Self::default() }
    }

    /// `true` when the clamp range is finite, non-inverted and within
    /// 0–100, and the jitter is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && 0.0 <= self.min
            && self.min <= self.max
            && self.max <= 100.0
            && self.jitter.is_finite()
            && self.jitter >= 0.0
    }
}

/// Classification default before jitter.  Link ramps use their parent road.
pub fn base_pci(kind: &RoadKind) -> f64 {
    match kind.base() {
        RoadKind::Motorway => 85.0,
        RoadKind::Trunk => 82.0,
        RoadKind::Primary => 80.0,
        RoadKind::Secondary => 75.0,
        RoadKind::Tertiary => 70.0,
        RoadKind::Residential | RoadKind::LivingStreet => 65.0,
        RoadKind::Service => 55.0,
        RoadKind::Unclassified | RoadKind::Other(_) => 60.0,
    }
}

/// Give every road without a PCI a synthetic one.  Returns the number
/// filled; `0` when the policy is disabled.
///
/// Each road's score depends only on `policy.seed` and its insertion index.
///
/// # Errors
///
/// [`JoinError::InvalidPolicy`] when `policy` fails
/// [`SyntheticPolicy::is_valid`]; no road is touched.
pub fn fill_synthetic_pci(index: &mut RoadIndex, policy: &SyntheticPolicy) -> JoinResult<usize> {
    if !policy.is_valid() {
        log::error!("[SyntheticPci] rejecting invalid policy {policy:?}");
        return Err(JoinError::InvalidPolicy(*policy));
    }
    if !policy.enabled {
        log::debug!("[SyntheticPci] policy disabled, nothing filled");
        return Ok(0);
    }

    let mut filled = 0;
    for (idx, kind, meta) in index.metadata_iter_mut() {
        if meta.has_pci() {
            continue;
        }
        let mut rng = SegmentRng::new(policy.seed, idx);
        let score = (base_pci(kind) + rng.jitter(policy.jitter)).clamp(policy.min, policy.max);

        meta.pci = Some(score);
        meta.pci_condition = Some(PciCondition::from_score(score));
        meta.inspection_date = None;
        meta.synthetic = true;
        filled += 1;
    }

    log::info!("[SyntheticPci] filled {filled} road(s) with synthetic PCI (seed {})", policy.seed);
    Ok(filled)
}
