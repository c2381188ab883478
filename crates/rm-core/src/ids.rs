//! Identifier types.
//!
//! Dense indices (`SegmentIdx`, `SignalId`) are `Copy + Ord + Hash` integer
//! wrappers used to index insertion-ordered `Vec`s.  `RoadId` is the stable,
//! source-derived key that every per-road datum is stored under.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Position of a segment in its index's insertion order.  Lower values
    /// were inserted earlier, which is what nearest-road tie-breaking uses.
    pub struct SegmentIdx(u32);
}

typed_id! {
    /// Position of a traffic signal in the signal registry.
    pub struct SignalId(u32);
}

// ── RoadId ────────────────────────────────────────────────────────────────────

/// Stable identifier of a road segment, derived from its source way id.
///
/// Source ids are namespaced as `way/<id>` so numeric and string way ids from
/// different loaders never collide with other element kinds.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RoadId(String);

impl RoadId {
    /// Derive the road id for a source way identifier.
    pub fn from_way(way_id: &str) -> Self {
        RoadId(format!("way/{}", way_id.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RoadId {
    fn from(way_id: u64) -> Self {
        RoadId(format!("way/{way_id}"))
    }
}
