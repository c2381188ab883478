//! campus — end-to-end walk through the roadmatch engine.
//!
//! Loads a handful of roads around a university campus from embedded
//! Overpass JSON, snaps traffic signals and a pavement survey onto them,
//! pushes a few traffic snapshots, then answers click-to-select queries.
//!
//! Run with `RUST_LOG=debug` to see per-element join decisions.

mod data;

use std::io::Cursor;
use std::time::Instant;

use anyhow::Result;

use rm_core::RoadId;
use rm_engine::{EngineConfig, RoadEngineBuilder};
use rm_join::load_pci_reader;
use rm_spatial::overpass::parse_overpass_json;
use rm_traffic::{TrafficLevel, TrafficMetrics};

use data::{CONFIG_JSON, OVERPASS_JSON, PCI_CSV};

// ── Click targets ─────────────────────────────────────────────────────────────

/// `(label, lon, lat, radius_m)`.
const CLICKS: &[(&str, f64, f64, f64)] = &[
    ("library steps",   -81.7745, 26.4636, 30.0),
    ("lakeside path",   -81.7731, 26.4604, 30.0),
    ("south entrance",  -81.7781, 26.4560, 30.0),
    ("middle of lawn",  -81.7725, 26.4618, 30.0),
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== campus — roadmatch demo ===");
    println!();

    // ── Configuration & network ───────────────────────────────────────────
    let config: EngineConfig = serde_json::from_str(CONFIG_JSON)?;
    let source = parse_overpass_json(OVERPASS_JSON)?;
    println!(
        "Source: {} highway ways, {} signal nodes",
        source.ways.len(),
        source.nodes.len()
    );

    let t0 = Instant::now();
    let (mut engine, report) = RoadEngineBuilder::new()
        .config(config)
        .network(source.ways)
        .build_with_report()?;
    println!(
        "Indexed {} roads in {:.3} ms ({} skipped, {} malformed tags)",
        report.loaded,
        t0.elapsed().as_secs_f64() * 1e3,
        report.skipped,
        report.malformed_tags
    );
    let unnamed = engine.all_roads().iter().filter(|r| !r.is_named()).count();
    if unnamed > 0 {
        println!("  {unnamed} road(s) carry a classification placeholder name");
    }
    for skipped in &report.skipped_ways {
        println!("  skipped way {}: {}", skipped.way_id, skipped.reason);
    }
    println!();

    // ── Point-feature joins ───────────────────────────────────────────────
    let signals = engine.load_signals(&source.nodes)?;
    println!(
        "Signals: {} loaded, {} associated, {} orphaned",
        signals.loaded, signals.associated, signals.orphaned
    );
    for s in engine.orphaned_signals() {
        println!("  orphaned signal {} at {}", s.source_id, s.location);
    }

    let records = load_pci_reader(Cursor::new(PCI_CSV))?;
    let pci = engine.join_pci(&records)?;
    println!(
        "PCI: {} joined onto {} roads, {} unmatched, {} rejected",
        pci.joined, pci.roads_updated, pci.unmatched, pci.rejected
    );
    let filled = engine.fill_synthetic_pci()?;
    println!("Synthetic PCI filled on {filled} road(s)");
    println!();

    // ── Traffic feed ──────────────────────────────────────────────────────
    let thresholds = engine.config().level_thresholds;
    for (way, volume) in [(101_u64, 620.0), (102, 310.0), (105, 180.0), (103, 40.0)] {
        let metrics = TrafficMetrics::from_volumes(volume, volume * 1.15, volume * 0.9, volume * 0.6, &thresholds);
        engine.set_traffic_data(&RoadId::from(way), metrics)?;
    }

    // ── Road table ────────────────────────────────────────────────────────
    println!(
        "{:<10} {:<24} {:<13} {:>8} {:>6} {:<10} {:>7} {:<9}",
        "Road", "Name", "Kind", "Length m", "PCI", "Condition", "Signals", "Traffic"
    );
    println!("{}", "-".repeat(96));
    for road in engine.all_roads() {
        let traffic = engine.traffic_data(&road.id)?;
        let meta = &road.metadata;
        println!(
            "{:<10} {:<24} {:<13} {:>8.0} {:>6} {:<10} {:>7} {:<9}",
            road.id.as_str(),
            road.name,
            road.kind.as_str(),
            road.length_m,
            meta.pci
                .map(|p| format!("{p:.0}{}", if meta.synthetic { "*" } else { "" }))
                .unwrap_or_else(|| "-".into()),
            meta.pci_condition.map(|c| c.as_str()).unwrap_or("-"),
            engine.signals_for_road(&road.id).len(),
            traffic.map(|t| t.level.to_string()).unwrap_or_else(|| "-".into()),
        );
    }
    println!("(* synthetic PCI)");
    println!();

    // ── Click-to-select ───────────────────────────────────────────────────
    for &(label, lon, lat, radius) in CLICKS {
        match engine.find_nearest_road(lon, lat, radius)? {
            Some(road) => println!("Click {label:<16} → {} ({})", road.name, road.id),
            None => println!("Click {label:<16} → no road within {radius} m"),
        }
    }

    let heavy: Vec<&str> = engine
        .roads_with_traffic_level(TrafficLevel::Heavy)?
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    println!("Heavy traffic: {}", heavy.join(", "));
    println!();

    // ── Diagnostics ───────────────────────────────────────────────────────
    engine.check_consistency()?;
    let stats = engine.stats()?;
    println!(
        "Stats: {} roads, {} index entries, {} traffic snapshots, {} signals ({} orphaned)",
        stats.road_count,
        stats.index_size,
        stats.traffic_data_count,
        stats.signal_count,
        stats.orphaned_signals
    );
    log::info!("[campus] done");
    Ok(())
}
