use heatmap::{Config, Coordinate, Heatmap, HeatmapError, ParseErrorKind, QueryFilter};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "network,geoname_id,registered_country_geoname_id,represented_country_geoname_id,is_anonymous_proxy,is_satellite_provider,postal_code,latitude,longitude,accuracy_radius";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn csv_for(coords: &[(f64, f64)]) -> String {
    let mut data = format!("{}\n", HEADER);
    for (i, (lat, lon)) in coords.iter().enumerate() {
        data.push_str(&format!(
            "2001:db8:{:x}::/48,{},{},,0,0,,{},{},20\n",
            i, 1000 + i, 2000 + i, lat, lon
        ));
    }
    data
}

/// Deterministic pseudo-random coordinates with plenty of duplicates.
fn synthetic_coords(n: usize) -> Vec<(f64, f64)> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    (0..n)
        .map(|_| {
            let lat = (next() % 1_800) as f64 / 10.0 - 90.0;
            let lon = (next() % 3_600) as f64 / 10.0 - 180.0;
            (lat, lon)
        })
        .collect()
}

fn expected_counts(coords: &[(f64, f64)]) -> HashMap<Coordinate, u64> {
    let mut counts = HashMap::new();
    for (lat, lon) in coords {
        *counts.entry(Coordinate::new(*lat, *lon)).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_full_range_returns_each_distinct_coordinate() {
    init_logger();
    let coords = synthetic_coords(5_000);
    let expected = expected_counts(&coords);

    let heatmap = Heatmap::new();
    heatmap.load_dataset(csv_for(&coords).as_bytes()).unwrap();

    let result = heatmap
        .query(&QueryFilter::new(-90.0, 90.0, -180.0, 180.0))
        .unwrap();
    assert_eq!(result.points.len(), expected.len());
    assert_eq!(result.max_count, *expected.values().max().unwrap());
    assert_eq!(result.total_count(), coords.len() as u64);

    for point in &result.points {
        assert_eq!(Some(&point.count), expected.get(&point.coordinate));
    }
}

#[test]
fn test_reload_is_idempotent() {
    let coords = synthetic_coords(2_000);
    let data = csv_for(&coords);
    let heatmap = Heatmap::new();

    let filters = [
        QueryFilter::unbounded(),
        QueryFilter::new(-10.0, 10.0, -10.0, 10.0),
        QueryFilter::new(30.0, 60.0, -130.0, -60.0),
        QueryFilter::new(0.0, 0.0, 0.0, 0.0),
    ];

    heatmap.load_dataset(data.as_bytes()).unwrap();
    let first: Vec<_> = filters.iter().map(|f| heatmap.query(f).unwrap()).collect();

    heatmap.load_dataset(data.as_bytes()).unwrap();
    let second: Vec<_> = filters.iter().map(|f| heatmap.query(f).unwrap()).collect();

    assert_eq!(first, second);
}

#[test]
fn test_heatmap_example() {
    let coords = [
        (1.0, 38.0),
        (1.0, 38.0),
        (1.0, 38.0),
        (1.0, 38.000001),
        (1.0, 38.000001),
    ];
    let heatmap = Heatmap::new();
    heatmap.load_dataset(csv_for(&coords).as_bytes()).unwrap();

    let both = heatmap
        .query(&QueryFilter::new(0.0, 2.0, 37.0, 39.0))
        .unwrap();
    let mut counts: Vec<_> = both.points.iter().map(|p| p.count).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![2, 3]);
    assert_eq!(both.max_count, 3);

    let narrowed = heatmap
        .query(&QueryFilter::new(0.0, 2.0, 37.0, 38.0))
        .unwrap();
    assert_eq!(narrowed.points.len(), 1);
    assert_eq!(narrowed.points[0].count, 3);
    assert_eq!(narrowed.max_count, 3);
}

#[test]
fn test_boundary_edges_are_inclusive() {
    let coords = [(10.0, 20.0), (10.0, 30.0), (15.0, 20.0), (15.0, 30.0), (12.5, 25.0)];
    let heatmap = Heatmap::new();
    heatmap.load_dataset(csv_for(&coords).as_bytes()).unwrap();

    let result = heatmap
        .query(&QueryFilter::new(10.0, 15.0, 20.0, 30.0))
        .unwrap();
    assert_eq!(result.points.len(), 5);

    let corner = heatmap
        .query(&QueryFilter::new(15.0, 15.0, 30.0, 30.0))
        .unwrap();
    assert_eq!(corner.points.len(), 1);
    assert_eq!(corner.points[0].coordinate, Coordinate::new(15.0, 30.0));
}

#[test]
fn test_disjoint_filter_is_empty() {
    let heatmap = Heatmap::new();
    heatmap
        .load_dataset(csv_for(&[(48.85, 2.35), (51.5, -0.12)]).as_bytes())
        .unwrap();

    let result = heatmap
        .query(&QueryFilter::new(-40.0, -30.0, 140.0, 160.0))
        .unwrap();
    assert!(result.points.is_empty());
    assert_eq!(result.max_count, 0);
}

#[test]
fn test_zero_filter_matches_only_origin() {
    let heatmap = Heatmap::new();
    heatmap
        .load_dataset(csv_for(&[(0.0, 0.0), (0.0, 0.0), (0.1, 0.0), (45.0, 45.0)]).as_bytes())
        .unwrap();

    let result = heatmap.query(&QueryFilter::default()).unwrap();
    assert_eq!(result.points.len(), 1);
    assert_eq!(result.max_count, 2);

    let everything = heatmap.query(&QueryFilter::unbounded()).unwrap();
    assert_eq!(everything.points.len(), 3);
}

#[test]
fn test_inverted_filter_behaviour() {
    let data = csv_for(&[(1.0, 1.0)]);

    let lenient = Heatmap::new();
    lenient.load_dataset(data.as_bytes()).unwrap();
    let result = lenient
        .query(&QueryFilter::new(5.0, -5.0, -5.0, 5.0))
        .unwrap();
    assert!(result.is_empty());

    let strict = Heatmap::with_config(Config::default().with_strict_filters(true)).unwrap();
    strict.load_dataset(data.as_bytes()).unwrap();
    assert!(matches!(
        strict.query(&QueryFilter::new(5.0, -5.0, -5.0, 5.0)),
        Err(HeatmapError::InvertedFilter)
    ));
}

#[test]
fn test_query_str_parses_bounds() {
    let heatmap = Heatmap::new();
    heatmap
        .load_dataset(csv_for(&[(35.69, 139.69)]).as_bytes())
        .unwrap();

    let result = heatmap.query_str("35", "36", "139", "140").unwrap();
    assert_eq!(result.points.len(), 1);

    let err = heatmap.query_str("35", "36", "west", "140").unwrap_err();
    assert!(err.is_client_error());
    assert!(matches!(err, HeatmapError::InvalidFilter { .. }));
}

#[test]
fn test_short_row_fails_and_keeps_previous_snapshot() {
    init_logger();
    let heatmap = Heatmap::new();
    heatmap
        .load_dataset(csv_for(&[(1.0, 38.0), (2.0, 39.0)]).as_bytes())
        .unwrap();
    let before = heatmap.query(&QueryFilter::unbounded()).unwrap();

    let mut bad = csv_for(&[(3.0, 40.0)]);
    bad.push_str("2001:db8::/32,1,1,,0,0,4.0,41.0,20\n");
    match heatmap.load_dataset(bad.as_bytes()) {
        Err(HeatmapError::Parse {
            line,
            kind: ParseErrorKind::ColumnCount { expected, found },
        }) => {
            assert_eq!(line, 3);
            assert_eq!(expected, 10);
            assert_eq!(found, 9);
        }
        other => panic!("expected column count error, got {:?}", other),
    }

    let after = heatmap.query(&QueryFilter::unbounded()).unwrap();
    assert_eq!(before, after);
    assert_eq!(heatmap.snapshot().unwrap().generation(), 1);
}

#[test]
fn test_load_from_path_skipping_missing_coordinates() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "2001:200::/32,1861060,1861060,,0,0,,35.6900,139.6900,100").unwrap();
    writeln!(file, "2001:218::/32,6252001,6252001,,0,0,,,,").unwrap();
    writeln!(file, "2001:230::/32,1835841,1835841,,0,0,,37.5112,126.9741,100").unwrap();
    file.flush().unwrap();

    let strict = Heatmap::new();
    assert!(matches!(
        strict.load_path(file.path()),
        Err(HeatmapError::Parse { line: 3, .. })
    ));

    let lenient =
        Heatmap::with_config(Config::default().with_skip_missing_coordinates(true)).unwrap();
    let report = lenient.load_path(file.path()).unwrap();
    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_skipped, 1);
    assert_eq!(report.distinct_points, 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let heatmap = Heatmap::new();
    assert!(matches!(
        heatmap.load_path("/nonexistent/GeoLite2-City-Blocks-IPv6.csv"),
        Err(HeatmapError::Io(_))
    ));
}

#[test]
fn test_grid_resolution_does_not_change_results() {
    let coords = synthetic_coords(3_000);
    let data = csv_for(&coords);
    let filter = QueryFilter::new(-45.5, 12.25, -100.0, 77.7);

    let mut results = Vec::new();
    for cell in [0.05, 1.0, 10.0, 360.0] {
        let heatmap =
            Heatmap::with_config(Config::default().with_grid_cell_degrees(cell)).unwrap();
        heatmap.load_dataset(data.as_bytes()).unwrap();
        let mut result = heatmap.query(&filter).unwrap();
        result.points.sort_by_key(|p| p.coordinate);
        results.push(result);
    }

    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
