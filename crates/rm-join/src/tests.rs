//! Unit tests for rm-join.

use rm_core::{GeoPoint, RawNode, Tags, meters_to_degrees};
use rm_spatial::{RoadIndex, RoadSegment, build_road_segment};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// East-west road `lat_m` metres north of the equator, lon 0.0 → 0.01.
fn road(id: &str, lat_m: f64, highway: &str) -> RoadSegment {
    let lat = meters_to_degrees(lat_m);
    let mut tags = Tags::new();
    tags.insert("highway".into(), highway.into());
    build_road_segment(id, &[GeoPoint::new(0.0, lat), GeoPoint::new(0.01, lat)], &tags).unwrap()
}

fn index_of(roads: Vec<RoadSegment>) -> RoadIndex {
    let mut index = RoadIndex::new();
    for r in roads {
        index.insert(r).unwrap();
    }
    index
}

/// Point at lon 0.005, `lat_m` metres north.
fn at(lat_m: f64) -> GeoPoint {
    GeoPoint::new(0.005, meters_to_degrees(lat_m))
}

fn signal(id: &str, lat_m: f64) -> RawNode {
    RawNode::new(id, at(lat_m)).with_tag("highway", "traffic_signals")
}

// ── Signals ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod signals {
    use super::*;
    use rm_core::RoadId;
    use rm_traffic::TrafficStore;

    use crate::{JoinError, SignalRegistry, associate_signals};

    #[test]
    fn associates_within_radius_and_counts() {
        init_logging();
        let index = index_of(vec![road("a", 0.0, "primary"), road("b", 200.0, "primary")]);
        let traffic = TrafficStore::new();
        let mut registry = SignalRegistry::new();

        let nodes = [signal("1", 5.0), signal("2", -10.0), signal("3", 195.0)];
        let report = associate_signals(&index, &traffic, &mut registry, &nodes, 25.0).unwrap();

        assert_eq!((report.loaded, report.associated, report.orphaned), (3, 3, 0));
        assert_eq!(traffic.signal_count(&RoadId::from_way("a")).unwrap(), 2);
        assert_eq!(traffic.signal_count(&RoadId::from_way("b")).unwrap(), 1);

        let on_a: Vec<&str> = registry
            .for_road(&RoadId::from_way("a"))
            .iter()
            .map(|s| s.source_id.as_str())
            .collect();
        assert_eq!(on_a, ["1", "2"]);
        let first = registry.iter().next().unwrap();
        assert!((first.distance_m.unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_signal_is_orphaned_not_dropped() {
        init_logging();
        let index = index_of(vec![road("a", 0.0, "primary")]);
        let traffic = TrafficStore::new();
        let mut registry = SignalRegistry::new();

        let bad = RawNode::new("nan", GeoPoint::new(f64::NAN, 0.0));
        let nodes = [signal("far", 100.0), bad];
        let report = associate_signals(&index, &traffic, &mut registry, &nodes, 25.0).unwrap();

        assert_eq!((report.loaded, report.associated, report.orphaned), (2, 0, 2));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.orphaned_count(), 2);
        let far = registry.orphaned().next().unwrap();
        assert_eq!(far.source_id, "far");
        assert!(far.associated_road.is_none() && far.distance_m.is_none());
        assert_eq!(traffic.total_signals().unwrap(), 0);
    }

    #[test]
    fn equidistant_signal_goes_to_earlier_road() {
        // Two parallel segments 40 m apart; the signal is 20 m from each.
        for (first, second) in [("A", "B"), ("B", "A")] {
            let lat_of = |name: &str| if name == "A" { 20.0 } else { -20.0 };
            let index = index_of(vec![road(first, lat_of(first), "primary"), road(second, lat_of(second), "primary")]);
            let traffic = TrafficStore::new();
            let mut registry = SignalRegistry::new();

            associate_signals(&index, &traffic, &mut registry, &[signal("s", 0.0)], 25.0).unwrap();

            let s = registry.iter().next().unwrap();
            assert_eq!(s.associated_road, Some(RoadId::from_way(first)));
            assert_eq!(traffic.signal_count(&RoadId::from_way(first)).unwrap(), 1);
            assert_eq!(traffic.signal_count(&RoadId::from_way(second)).unwrap(), 0);
        }
    }

    #[test]
    fn invalid_radius_is_an_error() {
        let index = index_of(vec![road("a", 0.0, "primary")]);
        let mut registry = SignalRegistry::new();
        let err = associate_signals(&index, &TrafficStore::new(), &mut registry, &[signal("1", 0.0)], -5.0);
        assert!(matches!(err, Err(JoinError::Spatial(_))));
        assert!(registry.is_empty());
    }
}

// ── PCI join ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pci {
    use super::*;
    use chrono::NaiveDate;
    use rm_core::RoadId;
    use rm_spatial::PciCondition;

    use crate::{PciRecord, join_pci};

    #[test]
    fn last_record_wins() {
        init_logging();
        let mut index = index_of(vec![road("a", 0.0, "secondary")]);
        let mut first = PciRecord::new(at(10.0), 90.0);
        first.surface = Some("concrete".into());
        let mut second = PciRecord::new(at(-30.0), 52.0);
        second.inspection_date = NaiveDate::from_ymd_opt(2024, 3, 18);

        let report = join_pci(&mut index, &[first, second], 50.0).unwrap();
        assert_eq!(report.joined, 2);
        assert_eq!(report.roads_updated, 1);

        let meta = &index.get(&RoadId::from_way("a")).unwrap().metadata;
        assert_eq!(meta.pci, Some(52.0));
        assert_eq!(meta.pci_condition, Some(PciCondition::Poor));
        assert_eq!(meta.inspection_date, NaiveDate::from_ymd_opt(2024, 3, 18));
        // Second record had no surface; the first one's stays.
        assert_eq!(meta.surface.as_deref(), Some("concrete"));
        assert!(!meta.synthetic);
    }

    #[test]
    fn surveyor_label_takes_precedence() {
        let mut index = index_of(vec![road("a", 0.0, "secondary")]);
        let mut rec = PciRecord::new(at(1.0), 88.0);
        rec.condition = Some(PciCondition::Good);
        join_pci(&mut index, &[rec], 50.0).unwrap();
        let meta = &index.get(&RoadId::from_way("a")).unwrap().metadata;
        assert_eq!(meta.pci_condition, Some(PciCondition::Good));
    }

    #[test]
    fn unmatched_and_rejected_are_counted() {
        init_logging();
        let mut index = index_of(vec![road("a", 0.0, "secondary")]);
        let records = [
            PciRecord::new(at(500.0), 70.0),
            PciRecord::new(at(1.0), 140.0),
            PciRecord::new(at(1.0), f64::NAN),
            PciRecord::new(GeoPoint::new(f64::INFINITY, 0.0), 70.0),
        ];
        let report = join_pci(&mut index, &records, 50.0).unwrap();
        assert_eq!((report.joined, report.unmatched, report.rejected), (0, 1, 3));
        assert!(index.get(&RoadId::from_way("a")).unwrap().metadata.pci.is_none());
    }

    #[test]
    fn clears_synthetic_flag() {
        let mut index = index_of(vec![road("a", 0.0, "secondary")]);
        index.metadata_mut(&RoadId::from_way("a")).unwrap().synthetic = true;
        join_pci(&mut index, &[PciRecord::new(at(0.0), 75.0)], 50.0).unwrap();
        assert!(!index.get(&RoadId::from_way("a")).unwrap().metadata.synthetic);
    }
}

// ── Synthetic fill ────────────────────────────────────────────────────────────

#[cfg(test)]
mod synthetic {
    use super::*;
    use rm_core::RoadId;
    use rm_spatial::RoadKind;

    use crate::{JoinError, PciRecord, SyntheticPolicy, base_pci, fill_synthetic_pci, join_pci};

    fn network() -> RoadIndex {
        index_of(vec![
            road("m", 0.0, "motorway"),
            road("r", 1_000.0, "residential"),
            road("s", 2_000.0, "service"),
            road("x", 3_000.0, "busway"),
        ])
    }

    #[test]
    fn disabled_by_default() {
        let mut index = network();
        assert!(!SyntheticPolicy::default().enabled);
        assert_eq!(fill_synthetic_pci(&mut index, &SyntheticPolicy::default()).unwrap(), 0);
        assert!(index.iter().all(|s| s.metadata.pci.is_none()));
    }

    #[test]
    fn residential_without_survey_gets_flagged_score_in_range() {
        init_logging();
        let mut index = network();
        // The only survey point is far from the residential road.
        join_pci(&mut index, &[PciRecord::new(at(0.0), 90.0)], 50.0).unwrap();

        let filled = fill_synthetic_pci(&mut index, &SyntheticPolicy::enabled_with_seed(7)).unwrap();
        assert_eq!(filled, 3);

        let r = &index.get(&RoadId::from_way("r")).unwrap().metadata;
        let pci = r.pci.unwrap();
        assert!((40.0..=95.0).contains(&pci), "pci {pci}");
        assert!((55.0..=75.0).contains(&pci), "residential base 65 ± 10, got {pci}");
        assert!(r.synthetic);
        assert!(r.pci_condition.is_some());

        // The surveyed road is untouched.
        let m = &index.get(&RoadId::from_way("m")).unwrap().metadata;
        assert_eq!(m.pci, Some(90.0));
        assert!(!m.synthetic);
    }

    #[test]
    fn same_seed_same_scores() {
        let policy = SyntheticPolicy::enabled_with_seed(42);
        let mut a = network();
        let mut b = network();
        fill_synthetic_pci(&mut a, &policy).unwrap();
        fill_synthetic_pci(&mut b, &policy).unwrap();
        let scores = |idx: &RoadIndex| idx.iter().map(|s| s.metadata.pci).collect::<Vec<_>>();
        assert_eq!(scores(&a), scores(&b));

        // Running again finds nothing left to fill.
        assert_eq!(fill_synthetic_pci(&mut a, &policy).unwrap(), 0);
    }

    #[test]
    fn clamp_applies() {
        let mut index = network();
        let policy = SyntheticPolicy { enabled: true, seed: 1, jitter: 50.0, min: 40.0, max: 95.0 };
        fill_synthetic_pci(&mut index, &policy).unwrap();
        assert!(index.iter().all(|s| (40.0..=95.0).contains(&s.metadata.pci.unwrap())));
    }

    #[test]
    fn bad_policy_is_an_error_and_leaves_roads_untouched() {
        let mut index = network();
        let inverted = SyntheticPolicy { enabled: true, seed: 1, jitter: 10.0, min: 95.0, max: 40.0 };
        let nan_bound = SyntheticPolicy { min: f64::NAN, ..SyntheticPolicy::enabled_with_seed(1) };
        let negative_jitter = SyntheticPolicy { jitter: -1.0, ..SyntheticPolicy::enabled_with_seed(1) };

        for policy in [inverted, nan_bound, negative_jitter] {
            let err = fill_synthetic_pci(&mut index, &policy).unwrap_err();
            assert!(matches!(err, JoinError::InvalidPolicy(_)), "{policy:?}");
        }
        assert!(index.iter().all(|s| s.metadata.pci.is_none() && !s.metadata.synthetic));
    }

    #[test]
    fn base_scores_by_class() {
        assert_eq!(base_pci(&RoadKind::Motorway), 85.0);
        assert_eq!(base_pci(&RoadKind::Residential), 65.0);
        assert_eq!(base_pci(&RoadKind::Service), 55.0);
        assert_eq!(base_pci(&RoadKind::from_tag("trunk_link")), 82.0);
        assert_eq!(base_pci(&RoadKind::from_tag("busway")), 60.0);
        assert!(base_pci(&RoadKind::Primary) > base_pci(&RoadKind::Residential));
    }

    #[test]
    fn policy_validation() {
        assert!(SyntheticPolicy::default().is_valid());
        assert!(!SyntheticPolicy { min: 90.0, max: 50.0, ..Default::default() }.is_valid());
        assert!(!SyntheticPolicy { jitter: -1.0, ..Default::default() }.is_valid());
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use chrono::NaiveDate;
    use rm_spatial::PciCondition;

    use crate::{JoinError, load_pci_reader};

    #[test]
    fn parses_full_and_sparse_rows() {
        let csv = "\
lon,lat,pci,condition,inspection_date,surface
-81.7712,26.4615,82,Good,2024-03-18,asphalt
-81.7689, 26.4630 ,47.5,,2023-11-02,
-81.7650,26.4598,91,,,
";
        let records = load_pci_reader(Cursor::new(csv)).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].condition, Some(PciCondition::Good));
        assert_eq!(records[0].inspection_date, NaiveDate::from_ymd_opt(2024, 3, 18));
        assert_eq!(records[0].surface.as_deref(), Some("asphalt"));

        assert_eq!(records[1].score, 47.5);
        assert_eq!(records[1].location.lat, 26.4630);
        assert!(records[1].condition.is_none() && records[1].surface.is_none());

        assert!(records[2].inspection_date.is_none());
    }

    #[test]
    fn bad_condition_reports_line() {
        let csv = "lon,lat,pci,condition,inspection_date,surface\n0,0,50,Meh,,\n";
        match load_pci_reader(Cursor::new(csv)) {
            Err(JoinError::Parse(msg)) => assert!(msg.contains("line 2"), "{msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_and_bad_number_fail() {
        let date = "lon,lat,pci,condition,inspection_date,surface\n0,0,50,,18/03/2024,\n";
        assert!(matches!(load_pci_reader(Cursor::new(date)), Err(JoinError::Parse(_))));

        let number = "lon,lat,pci,condition,inspection_date,surface\n0,0,high,,,\n";
        assert!(matches!(load_pci_reader(Cursor::new(number)), Err(JoinError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = crate::load_pci_csv(std::path::Path::new("/nonexistent/pci.csv")).unwrap_err();
        assert!(matches!(err, JoinError::Io(_)));
    }
}
