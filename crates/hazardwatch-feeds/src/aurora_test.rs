use serde_json::json;

use super::*;

fn triples(samples: &[AuroraSample]) -> Vec<(f64, f64, f64)> {
    let mut out: Vec<_> = samples
        .iter()
        .map(|s| (s.lat(), s.lon(), s.value()))
        .collect();
    out.sort_by(|a, b| a.partial_cmp(b).expect("samples are finite"));
    out
}

fn expected_pair() -> Vec<(f64, f64, f64)> {
    vec![(61.5, -150.0, 54.0), (65.1, -95.4, 78.0)]
}

#[test]
fn tuple_rows_drop_out_of_range_entries() {
    let samples = normalize_aurora(&json!([[67.2, -33.8, 85], [999, 0, 10]])).unwrap();
    assert_eq!(triples(&samples), vec![(67.2, -33.8, 85.0)]);
}

#[test]
fn tuple_rows_detect_longitude_first() {
    let samples = normalize_aurora(&json!([[-150.0, 61.5, 54]])).unwrap();
    assert_eq!(triples(&samples), vec![(61.5, -150.0, 54.0)]);
}

#[test]
fn ambiguous_tuple_reads_first_element_as_latitude() {
    // Both 10 and 20 are valid latitudes; the first wins.
    let samples = normalize_aurora(&json!([[10, 20, 5]])).unwrap();
    assert_eq!(triples(&samples), vec![(10.0, 20.0, 5.0)]);
}

#[test]
fn every_encoding_yields_the_same_samples() {
    let fixtures = [
        json!([[61.5, -150.0, 54], [-95.4, 65.1, 78]]),
        json!([
            {"latitude": 61.5, "lon": -150.0, "prob": 54},
            {"lat": 65.1, "longitude": -95.4, "intensity": 78}
        ]),
        json!({
            "coordinates": [[-150.0, 61.5], [-95.4, 65.1]],
            "values": [54, 78]
        }),
        json!({
            "latitudes": [61.5, 65.1],
            "longitudes": [-150.0, -95.4],
            "data": [[54, -1], [-1, 78]]
        }),
        json!({
            "features": [
                {"properties": {"probability": 54}, "geometry": {"coordinates": [-150.0, 61.5]}},
                {"properties": {"amp": 78}, "geometry": {"coordinates": [[[-95.4, 65.1]]]}}
            ]
        }),
    ];

    for fixture in &fixtures {
        let samples = normalize_aurora(fixture)
            .unwrap_or_else(|e| panic!("fixture {fixture} failed: {e}"));
        assert_eq!(triples(&samples), expected_pair(), "fixture {fixture}");
    }
}

#[test]
fn keyed_rows_accept_numeric_strings() {
    let samples =
        normalize_aurora(&json!([{"lat": "64.8", "lon": "-147.7", "value": "12"}])).unwrap();
    assert_eq!(triples(&samples), vec![(64.8, -147.7, 12.0)]);
}

#[test]
fn parallel_arrays_accept_keyed_coordinates() {
    let raw = json!({
        "coordinates": [{"lat": 61.5, "lon": -150.0}, {"latitude": 65.1, "longitude": -95.4}],
        "intensity": [54, 78]
    });
    assert_eq!(triples(&normalize_aurora(&raw).unwrap()), expected_pair());
}

#[test]
fn ovation_triples_wrap_eastern_longitudes() {
    let raw = json!({
        "Observation Time": "2024-03-24T12:00:00Z",
        "Data Format": "[Longitude, Latitude, Aurora]",
        "coordinates": [[200, 65, 10], [0, -90, 0], [359, 91, 4]]
    });
    let samples = normalize_aurora(&raw).unwrap();
    assert_eq!(triples(&samples), vec![(-90.0, 0.0, 0.0), (65.0, -160.0, 10.0)]);
}

#[test]
fn features_default_to_zero_probability() {
    let raw = json!({
        "features": [{"geometry": {"coordinates": [[10.0, 70.0], [20.0, 71.0]]}}]
    });
    let samples = normalize_aurora(&raw).unwrap();
    assert_eq!(triples(&samples), vec![(70.0, 10.0, 0.0), (71.0, 20.0, 0.0)]);
}

#[test]
fn features_with_garbage_value_are_dropped() {
    let raw = json!({
        "features": [
            {"properties": {"probability": "high"}, "geometry": {"coordinates": [10.0, 70.0]}},
            {"properties": {"value": 5}, "geometry": {"coordinates": [11.0, 71.0]}}
        ]
    });
    assert_eq!(triples(&normalize_aurora(&raw).unwrap()), vec![(71.0, 11.0, 5.0)]);
}

#[test]
fn all_invalid_samples_is_a_shape_error() {
    let err = normalize_aurora(&json!([[999, 999, 1], [10, 10, -5]])).unwrap_err();
    assert!(
        matches!(err, FeedError::Shape { ref reason } if reason.contains("no valid samples")),
        "got {err:?}"
    );
}

#[test]
fn unknown_shapes_are_shape_errors() {
    for raw in [json!({"foo": 1}), json!("aurora"), json!(null), json!(42)] {
        let err = normalize_aurora(&raw).unwrap_err();
        assert!(
            matches!(err, FeedError::Shape { ref reason } if reason.contains("no known")),
            "raw {raw} gave {err:?}"
        );
    }
}

#[test]
fn mismatched_parallel_arrays_are_not_paired() {
    let raw = json!({"coordinates": [[-150.0, 61.5]], "values": [54, 78]});
    assert!(normalize_aurora(&raw).is_err());
}

#[test]
fn relay_contents_are_unwrapped() {
    let body = r#"{"contents": "[[67.2, -33.8, 85]]", "status": {"http_code": 200}}"#;
    let inner = unwrap_relay_contents(body).unwrap();
    assert_eq!(inner, json!([[67.2, -33.8, 85]]));
}

#[test]
fn relay_without_contents_is_rejected() {
    assert_eq!(
        unwrap_relay_contents(r#"{"contents": ""}"#).unwrap_err(),
        "wrapped response missing contents"
    );
    assert!(unwrap_relay_contents(r#"{"contents": "<html>"}"#)
        .unwrap_err()
        .starts_with("wrapped contents"));
    assert!(unwrap_relay_contents("not json").is_err());
}

#[test]
fn aurora_sources_are_ordered_and_encoded() {
    let endpoints = Endpoints::default();
    let sources = aurora_sources(&endpoints);
    let labels: Vec<&str> = sources.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["direct", "allorigins-wrapped", "allorigins-raw"]);
    assert_eq!(sources[0].url, endpoints.aurora);
    assert!(sources[1].url.starts_with("https://api.allorigins.win/get?url=https%3A%2F%2F"));
    assert!(sources[1].parse.is_some());
    assert!(sources[2].url.starts_with("https://api.allorigins.win/raw?url="));
    assert!(sources[2].parse.is_none());
}

#[test]
fn strongest_sorts_descending_and_truncates() {
    let report = AuroraReport::fallback(Vec::new());
    assert!(report.is_fallback());
    assert_eq!(report.status.as_deref(), Some(FALLBACK_STATUS));
    let top: Vec<f64> = report.strongest(3).iter().map(AuroraSample::value).collect();
    assert_eq!(top, vec![85.0, 78.0, 62.0]);
}
