//! `rm-join` — attach point features to their nearest road.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`signal`]    | `TrafficSignal`, `SignalRegistry`, `associate_signals`       |
//! | [`pci`]       | `PciRecord`, `join_pci`, `PciJoinReport`                     |
//! | [`synthetic`] | `SyntheticPolicy`, `fill_synthetic_pci`, `base_pci`          |
//! | [`loader`]    | `load_pci_csv`, `load_pci_reader`                            |
//! | [`error`]     | `JoinError`, `JoinResult<T>`                                 |
//!
//! # Join passes
//!
//! Every pass is a sequence of [`RoadIndex::nearest`](rm_spatial::RoadIndex::nearest)
//! calls with a per-pass radius:
//!
//! 1. **Signals** (default 25 m): a hit sets the signal's back-reference and
//!    bumps the road's signal count in the `TrafficStore`.  A miss keeps the
//!    signal in the registry as *orphaned*.
//! 2. **PCI** (default 50 m): a hit overwrites the road's PCI fields.  Records
//!    are applied in input order, so the last record for a road wins.
//! 3. **Synthetic fill** (off by default): roads still without a PCI get a
//!    classification-based score with seeded jitter, flagged `synthetic`.

pub mod error;
pub mod loader;
pub mod pci;
pub mod signal;
pub mod synthetic;

#[cfg(test)]
mod tests;

pub use error::{JoinError, JoinResult};
pub use loader::{load_pci_csv, load_pci_reader};
pub use pci::{PciJoinReport, PciRecord, join_pci};
pub use signal::{SignalLoadReport, SignalRegistry, TrafficSignal, associate_signals};
pub use synthetic::{SyntheticPolicy, base_pci, fill_synthetic_pci};
