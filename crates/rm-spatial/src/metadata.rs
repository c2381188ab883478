//! Per-segment metadata and defensive tag parsing.
//!
//! Numeric tags are parsed leniently: a value that cannot be read becomes
//! `None` and is reported as a [`MalformedTag`], never a construction error.

use chrono::NaiveDate;

use rm_core::Tags;

// ── PCI labels ────────────────────────────────────────────────────────────────

/// Condition label for a Pavement Condition Index score.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PciCondition {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl PciCondition {
    /// Band a 0–100 score: ≥85 Excellent, ≥70 Good, ≥55 Fair, ≥40 Poor.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 85.0 => PciCondition::Excellent,
            s if s >= 70.0 => PciCondition::Good,
            s if s >= 55.0 => PciCondition::Fair,
            s if s >= 40.0 => PciCondition::Poor,
            _ => PciCondition::Critical,
        }
    }

    /// Case-insensitive parse of a survey label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(PciCondition::Excellent),
            "good" => Some(PciCondition::Good),
            "fair" => Some(PciCondition::Fair),
            "poor" => Some(PciCondition::Poor),
            "critical" | "failed" => Some(PciCondition::Critical),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PciCondition::Excellent => "Excellent",
            PciCondition::Good => "Good",
            PciCondition::Fair => "Fair",
            PciCondition::Poor => "Poor",
            PciCondition::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for PciCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maintenance urgency derived from a PCI score.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaintenancePriority {
    Low,
    Medium,
    High,
}

impl MaintenancePriority {
    /// <55 High, <70 Medium, otherwise Low.
    pub fn from_score(score: f64) -> Self {
        if score < 55.0 {
            MaintenancePriority::High
        } else if score < 70.0 {
            MaintenancePriority::Medium
        } else {
            MaintenancePriority::Low
        }
    }
}

// ── RoadMetadata ──────────────────────────────────────────────────────────────

/// Mutable per-road attributes.  Tag-derived fields are set at construction;
/// the PCI fields stay `None` until a join or synthetic fill writes them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadMetadata {
    pub lanes:           Option<u8>,
    /// Posted limit with the unit suffix stripped (`"35 mph"` → `35.0`).
    pub speed_limit:     Option<f64>,
    pub surface:         Option<String>,
    pub pci:             Option<f64>,
    pub pci_condition:   Option<PciCondition>,
    pub inspection_date: Option<NaiveDate>,
    /// `true` when `pci` was fabricated by the synthetic-fill policy.
    pub synthetic:       bool,
}

impl RoadMetadata {
    /// Parse the recognised tags, collecting any that could not be read.
    pub fn from_tags(tags: &Tags) -> (Self, Vec<MalformedTag>) {
        let mut malformed = Vec::new();

        let lanes = tags.get("lanes").and_then(|v| {
            let parsed = parse_lanes(v);
            if parsed.is_none() {
                malformed.push(MalformedTag::new("lanes", v));
            }
            parsed
        });

        let speed_limit = tags.get("maxspeed").and_then(|v| {
            let parsed = parse_speed(v);
            if parsed.is_none() {
                malformed.push(MalformedTag::new("maxspeed", v));
            }
            parsed
        });

        let surface = tags
            .get("surface")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let meta = RoadMetadata { lanes, speed_limit, surface, ..Default::default() };
        (meta, malformed)
    }

    pub fn has_pci(&self) -> bool {
        self.pci.is_some()
    }

    pub fn maintenance_priority(&self) -> Option<MaintenancePriority> {
        self.pci.map(MaintenancePriority::from_score)
    }
}

/// A tag whose value could not be parsed; the field was left unset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedTag {
    pub key:   &'static str,
    pub value: String,
}

impl MalformedTag {
    fn new(key: &'static str, value: &str) -> Self {
        Self { key, value: value.to_owned() }
    }
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// Whole positive lane count; `"2;3"`, `"two"`, `"0"` are rejected.
fn parse_lanes(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|&n| n > 0)
}

/// Leading number of a `maxspeed` value with an optional unit suffix.
///
/// Accepts `"50"`, `"35 mph"`, `"50km/h"`, `"12.5 knots"`.  Symbolic values
/// (`"signals"`, `"RU:urban"`) and lists (`"30;50"`) are rejected.
fn parse_speed(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);

    let unit_ok = matches!(unit.trim(), "" | "mph" | "km/h" | "kmh" | "kph" | "knots");
    if !unit_ok {
        return None;
    }

    number.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
}
