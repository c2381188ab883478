//! Unit tests for rm-engine.

use rm_core::{GeoPoint, RawNode, RawWay, RoadId, meters_to_degrees};
use rm_traffic::{LevelThresholds, TrafficMetrics};

use crate::{RoadEngine, RoadEngineBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// East-west way `lat_m` metres north of the equator, lon 0.0 → 0.01.
fn way(id: &str, lat_m: f64, highway: &str) -> RawWay {
    let lat = meters_to_degrees(lat_m);
    RawWay::new(id, vec![GeoPoint::new(0.0, lat), GeoPoint::new(0.01, lat)]).with_tag("highway", highway)
}

/// Ten ways 100 m apart; way "5" has a single point.
fn ten_ways() -> Vec<RawWay> {
    (0..10)
        .map(|i| {
            let mut w = way(&i.to_string(), i as f64 * 100.0, "residential");
            if i == 5 {
                w.points.truncate(1);
            }
            w
        })
        .collect()
}

fn at(lat_m: f64) -> GeoPoint {
    GeoPoint::new(0.005, meters_to_degrees(lat_m))
}

fn engine_with(ways: Vec<RawWay>) -> RoadEngine {
    RoadEngineBuilder::new().network(ways).build().unwrap()
}

fn metrics(volume: f64) -> TrafficMetrics {
    TrafficMetrics::from_volumes(volume, volume, volume, volume, &LevelThresholds::default())
}

// ── Config & builder ──────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;
    use rm_join::SyntheticPolicy;

    use crate::{EngineConfig, EngineError};

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.signal_radius_m, 25.0);
        assert_eq!(c.pci_radius_m, 50.0);
        assert!(!c.synthetic.enabled);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn invalid_values_rejected() {
        for bad in [
            EngineConfig { signal_radius_m: 0.0, ..Default::default() },
            EngineConfig { pci_radius_m: f64::NAN, ..Default::default() },
            EngineConfig {
                synthetic: SyntheticPolicy { min: 95.0, max: 40.0, ..Default::default() },
                ..Default::default()
            },
            EngineConfig {
                level_thresholds: LevelThresholds { heavy: 10.0, moderate: 20.0, light: 30.0 },
                ..Default::default()
            },
        ] {
            assert!(matches!(bad.validate(), Err(EngineError::Config(_))), "{bad:?}");
        }
    }

    #[test]
    fn builder_setters_override_config() {
        let base = EngineConfig { signal_radius_m: 10.0, pci_radius_m: 80.0, ..Default::default() };
        let engine = RoadEngineBuilder::new()
            .pci_radius_m(60.0)
            .config(base)
            .synthetic(SyntheticPolicy::enabled_with_seed(3))
            .build()
            .unwrap();
        assert_eq!(engine.config().signal_radius_m, 10.0);
        assert_eq!(engine.config().pci_radius_m, 60.0);
        assert!(engine.config().synthetic.enabled);
    }

    #[test]
    fn builder_validates() {
        let err = RoadEngineBuilder::new().signal_radius_m(-1.0).build();
        assert!(matches!(err, Err(EngineError::Config(_))));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RoadEngine>();
    }
}

// ── Network loading ───────────────────────────────────────────────────────────

#[cfg(test)]
mod loading {
    use super::*;

    #[test]
    fn single_point_way_is_skipped_not_fatal() {
        init_logging();
        let (engine, report) = RoadEngineBuilder::new().network(ten_ways()).build_with_report().unwrap();

        assert_eq!(report.loaded, 9);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.skipped_ways[0].way_id, "5");
        assert!(engine.get_road(&RoadId::from_way("5")).is_none());

        let stats = engine.stats().unwrap();
        assert_eq!(stats.road_count, 9);
        assert_eq!(stats.index_size, 9);
        assert_eq!(stats.traffic_data_count, 0);
    }

    #[test]
    fn duplicates_and_malformed_tags_reported() {
        init_logging();
        let mut engine = engine_with(vec![way("1", 0.0, "primary")]);
        let report = engine.load_network(&[
            way("1", 500.0, "primary"),
            way("2", 100.0, "primary").with_tag("lanes", "many"),
            way("2", 300.0, "primary"),
        ]);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.malformed_tags, 1);
        assert!(report.skipped_ways.iter().all(|s| s.reason.contains("duplicate")));

        // The original way 1 is untouched.
        let one = engine.get_road(&RoadId::from_way("1")).unwrap();
        assert_eq!(one.positions[0].lat, 0.0);
    }

    #[test]
    fn reload_is_idempotent() {
        let mut engine = engine_with(ten_ways());
        let before = engine.all_roads();
        let report = engine.reload_network(&ten_ways()).unwrap();
        assert_eq!(report.loaded, 9);
        assert_eq!(engine.all_roads(), before);
        assert_eq!(engine.stats().unwrap().index_size, 9);
    }

    #[test]
    fn reload_drops_auxiliary_data() {
        let mut engine = engine_with(ten_ways());
        engine.set_traffic_data(&RoadId::from_way("0"), metrics(300.0)).unwrap();
        engine.load_signals(&[RawNode::new("s", at(1.0))]).unwrap();

        engine.reload_network(&[way("x", 0.0, "primary")]).unwrap();
        let stats = engine.stats().unwrap();
        assert_eq!((stats.road_count, stats.traffic_data_count, stats.signal_count), (1, 0, 0));
        assert!(engine.check_consistency().is_ok());
    }

    #[test]
    fn all_roads_in_insertion_order() {
        let engine = engine_with(vec![way("b", 0.0, "primary"), way("a", 100.0, "primary")]);
        let ids: Vec<String> = engine.all_roads().into_iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, ["way/b", "way/a"]);
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use super::*;
    use rm_core::BBox;

    use crate::EngineError;

    #[test]
    fn nearest_road_lookup() {
        let engine = engine_with(ten_ways());
        let road = engine.find_nearest_road(0.005, meters_to_degrees(210.0), 30.0).unwrap().unwrap();
        assert_eq!(road.id, RoadId::from_way("2"));
        // Way 5 was skipped; 500 m is 100 m from ways 4 and 6.
        assert!(engine.find_nearest_road(0.005, meters_to_degrees(500.0), 50.0).unwrap().is_none());
    }

    #[test]
    fn empty_engine_finds_nothing() {
        let engine = RoadEngineBuilder::new().build().unwrap();
        assert!(engine.find_nearest_road(-81.77, 26.46, 1_000.0).unwrap().is_none());
        assert!(engine.all_roads().is_empty());
    }

    #[test]
    fn bad_query_is_error() {
        let engine = engine_with(ten_ways());
        assert!(matches!(engine.find_nearest_road(f64::NAN, 0.0, 10.0), Err(EngineError::Spatial(_))));
    }

    #[test]
    fn roads_near_sorted_and_bbox() {
        let engine = engine_with(ten_ways());
        let near: Vec<String> = engine
            .roads_near(0.005, meters_to_degrees(140.0), 100.0)
            .unwrap()
            .iter()
            .map(|m| m.segment.id.to_string())
            .collect();
        assert_eq!(near, ["way/1", "way/2"]);

        let bbox = BBox::new(-0.001, meters_to_degrees(250.0), 0.02, meters_to_degrees(450.0));
        let ids: Vec<&str> = engine.roads_in_bbox(&bbox).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["way/3", "way/4"]);
    }
}

// ── Traffic ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod traffic {
    use super::*;
    use rm_traffic::TrafficLevel;

    use crate::EngineError;

    #[test]
    fn unknown_road_rejected() {
        let engine = engine_with(ten_ways());
        let err = engine.set_traffic_data(&RoadId::from_way("5"), metrics(100.0)).unwrap_err();
        assert!(matches!(err, EngineError::UnknownRoad(_)));
        assert!(engine.traffic_data(&RoadId::from_way("5")).unwrap().is_none());
    }

    #[test]
    fn overwrite_keeps_signal_count() {
        let mut engine = engine_with(ten_ways());
        let road = RoadId::from_way("3");
        engine.load_signals(&[RawNode::new("s1", at(302.0)), RawNode::new("s2", at(298.0))]).unwrap();

        engine.set_traffic_data(&road, metrics(100.0)).unwrap();
        engine.set_traffic_data(&road, metrics(450.0)).unwrap();

        let snap = engine.traffic_data(&road).unwrap().unwrap();
        assert_eq!(snap.current_volume, 450.0);
        assert_eq!(snap.level, TrafficLevel::Heavy);
        assert_eq!(snap.signal_count, 2);
        assert_eq!(engine.stats().unwrap().traffic_data_count, 1);
    }

    #[test]
    fn filter_by_level() {
        let engine = engine_with(ten_ways());
        engine.set_traffic_data(&RoadId::from_way("7"), metrics(500.0)).unwrap();
        engine.set_traffic_data(&RoadId::from_way("1"), metrics(420.0)).unwrap();
        engine.set_traffic_data(&RoadId::from_way("2"), metrics(20.0)).unwrap();

        let heavy: Vec<&str> = engine
            .roads_with_traffic_level(TrafficLevel::Heavy)
            .unwrap()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(heavy, ["way/1", "way/7"]);
    }

    #[test]
    fn concurrent_readers_share_engine() {
        use std::sync::Arc;
        use std::thread;

        let engine = Arc::new(engine_with(ten_ways()));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    for i in 0..50 {
                        let road = RoadId::from_way(&((t + i) % 10 % 5).to_string());
                        engine.set_traffic_data(&road, metrics(f64::from(i))).unwrap();
                        assert!(engine.find_nearest_road(0.005, 0.0, 10.0).unwrap().is_some());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(engine.stats().unwrap().traffic_data_count, 5);
    }
}

// ── Joins through the facade ──────────────────────────────────────────────────

#[cfg(test)]
mod joins {
    use super::*;
    use rm_join::{PciRecord, SyntheticPolicy};

    #[test]
    fn signal_tie_break_follows_insertion_order() {
        // Parallel roads 40 m apart, signal 20 m from each.
        let mut a_first = engine_with(vec![way("A", 20.0, "primary"), way("B", -20.0, "primary")]);
        let mut b_first = engine_with(vec![way("B", -20.0, "primary"), way("A", 20.0, "primary")]);
        let signal = [RawNode::new("s", at(0.0))];

        a_first.load_signals(&signal).unwrap();
        b_first.load_signals(&signal).unwrap();

        assert_eq!(a_first.signals_for_road(&RoadId::from_way("A")).len(), 1);
        assert_eq!(b_first.signals_for_road(&RoadId::from_way("B")).len(), 1);
    }

    #[test]
    fn orphaned_signals_stay_queryable() {
        init_logging();
        let mut engine = engine_with(ten_ways());
        let report = engine
            .load_signals(&[RawNode::new("near", at(1.0)), RawNode::new("lost", at(500.0))])
            .unwrap();
        assert_eq!((report.loaded, report.associated, report.orphaned), (2, 1, 1));

        let orphans = engine.orphaned_signals();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].source_id, "lost");
        assert_eq!(engine.signals().count(), 2);

        let stats = engine.stats().unwrap();
        assert_eq!((stats.signal_count, stats.orphaned_signals), (2, 1));
    }

    #[test]
    fn signal_reload_replaces_counts() {
        let mut engine = engine_with(ten_ways());
        let road = RoadId::from_way("0");
        engine.load_signals(&[RawNode::new("a", at(1.0)), RawNode::new("b", at(2.0))]).unwrap();
        engine.load_signals(&[RawNode::new("c", at(3.0))]).unwrap();
        assert_eq!(engine.traffic().signal_count(&road).unwrap(), 1);
        assert_eq!(engine.signals_for_road(&road).len(), 1);
    }

    #[test]
    fn synthetic_fill_off_unless_configured() {
        let mut engine = engine_with(vec![way("r", 0.0, "residential")]);
        assert_eq!(engine.fill_synthetic_pci().unwrap(), 0);
        assert!(engine.get_road(&RoadId::from_way("r")).unwrap().metadata.pci.is_none());
    }

    #[test]
    fn residential_gets_synthetic_pci_when_unmatched() {
        init_logging();
        let mut engine = RoadEngineBuilder::new()
            .synthetic(SyntheticPolicy::enabled_with_seed(11))
            .network(vec![way("r", 0.0, "residential"), way("p", 1_000.0, "primary")])
            .build()
            .unwrap();

        // Survey point is 200 m from the residential road, 800 m from the primary.
        let report = engine.join_pci(&[PciRecord::new(at(200.0), 88.0)]).unwrap();
        assert_eq!(report.unmatched, 1);

        assert_eq!(engine.fill_synthetic_pci().unwrap(), 2);
        let meta = &engine.get_road(&RoadId::from_way("r")).unwrap().metadata;
        let pci = meta.pci.unwrap();
        assert!((40.0..=95.0).contains(&pci), "pci {pci}");
        assert!(meta.synthetic);
    }

    #[test]
    fn measured_pci_not_overwritten_by_fill() {
        let mut engine = RoadEngineBuilder::new()
            .synthetic(SyntheticPolicy::enabled_with_seed(0))
            .network(vec![way("p", 0.0, "primary")])
            .build()
            .unwrap();
        let report = engine.join_pci(&[PciRecord::new(at(30.0), 61.0)]).unwrap();
        assert_eq!(report.joined, 1);
        assert_eq!(engine.fill_synthetic_pci().unwrap(), 0);

        let meta = &engine.get_road(&RoadId::from_way("p")).unwrap().metadata;
        assert_eq!(meta.pci, Some(61.0));
        assert!(!meta.synthetic);
    }
}

// ── Consistency ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod consistency {
    use super::*;

    use crate::EngineError;

    #[test]
    fn healthy_engine_passes() {
        let mut engine = engine_with(ten_ways());
        engine.set_traffic_data(&RoadId::from_way("1"), metrics(10.0)).unwrap();
        engine.load_signals(&[RawNode::new("s", at(0.0))]).unwrap();
        assert!(engine.check_consistency().is_ok());
    }

    #[test]
    fn stray_traffic_entry_detected() {
        init_logging();
        let engine = engine_with(ten_ways());
        // Bypass the engine's id check.
        engine.traffic.set(RoadId::from_way("ghost"), metrics(10.0)).unwrap();

        assert!(matches!(engine.check_consistency(), Err(EngineError::IndexInconsistency(_))));
        assert!(matches!(
            engine.traffic_data(&RoadId::from_way("ghost")),
            Err(EngineError::IndexInconsistency(_))
        ));
    }

    #[test]
    fn clear_empties_all_stores() {
        let mut engine = engine_with(ten_ways());
        engine.set_traffic_data(&RoadId::from_way("1"), metrics(10.0)).unwrap();
        engine.clear().unwrap();
        let stats = engine.stats().unwrap();
        assert_eq!(stats, Default::default());
        assert!(engine.check_consistency().is_ok());
    }
}
