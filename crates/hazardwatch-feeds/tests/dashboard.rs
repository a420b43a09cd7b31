//! Hazard feeds and the dashboard fan-out against wiremock.

use hazardwatch_core::{Endpoints, QuakeWindow};
use hazardwatch_feeds::hazards::{fetch_earthquakes, fetch_solar_flares, fetch_weather_alerts};
use hazardwatch_feeds::{refresh_dashboard, FeedError, JsonFetcher};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> JsonFetcher {
    JsonFetcher::new(5, "hazardwatch-test/0.1").expect("client construction should not fail")
}

fn endpoints(server: &MockServer) -> Endpoints {
    let uri = server.uri();
    Endpoints {
        usgs_query: format!("{uri}/fdsnws/event/1/query"),
        nws_alerts: format!("{uri}/alerts/active"),
        swpc_xrays: format!("{uri}/json/goes/primary/xrays-1-day.json"),
        aurora: format!("{uri}/json/ovation_aurora_latest.json"),
        cors_proxy: uri,
        ..Endpoints::default()
    }
}

async fn mount_quakes(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/fdsnws/event/1/query"))
        .and(query_param("format", "geojson"))
        .and(query_param("orderby", "time"))
        .and(query_param("limit", "150"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "id": "us7000abcd",
                    "properties": {"mag": 6.4, "place": "120 km SW of Adak, Alaska", "time": 1_705_280_400_000_i64},
                    "geometry": {"type": "Point", "coordinates": [-177.9, 51.2, 35.0]}
                },
                {
                    "id": "ak0242",
                    "properties": {"mag": 1.8, "place": "8 km N of Healy, Alaska", "time": 1_705_276_800_000_i64},
                    "geometry": {"type": "Point", "coordinates": [-148.9, 63.9, 9.1]}
                }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_flares(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/json/goes/primary/xrays-1-day.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"time_tag": "2024-01-15T00:00:00Z", "satellite": 16, "flux": 3.2e-6, "energy": "0.1-0.8nm"},
            {"time_tag": "2024-01-15T00:01:00Z", "satellite": 16, "flux": 1.1e-5, "energy": "0.1-0.8nm"}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn earthquakes_are_fetched_for_the_window() {
    let server = MockServer::start().await;
    mount_quakes(&server).await;

    let quakes = fetch_earthquakes(&fetcher(), &endpoints(&server), QuakeWindow::Hour)
        .await
        .expect("should parse quakes");

    assert_eq!(quakes.len(), 2);
    assert_eq!(quakes[0].id, "us7000abcd");
    assert_eq!(quakes[0].mag, Some(6.4));
    assert_eq!(quakes[0].depth, Some(35.0));
    assert_eq!(quakes[1].lat, Some(63.9));
}

#[tokio::test]
async fn alerts_and_flares_parse() {
    let server = MockServer::start().await;
    mount_flares(&server).await;
    Mock::given(method("GET"))
        .and(path("/alerts/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [{"properties": {
                "event": "Winter Weather Advisory",
                "areaDesc": "Denali",
                "effective": "2024-01-15T01:30:00Z"
            }}]
        })))
        .mount(&server)
        .await;

    let endpoints = endpoints(&server);
    let alerts = fetch_weather_alerts(&fetcher(), &endpoints)
        .await
        .expect("should parse alerts");
    let flares = fetch_solar_flares(&fetcher(), &endpoints)
        .await
        .expect("should parse flares");

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].area.as_deref(), Some("Denali"));
    assert_eq!(flares.len(), 2);
    assert_eq!(flares[1].flux, Some(1.1e-5));
}

#[tokio::test]
async fn one_failing_feed_does_not_block_the_others() {
    let server = MockServer::start().await;
    mount_quakes(&server).await;
    mount_flares(&server).await;
    Mock::given(method("GET"))
        .and(path("/alerts/active"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/json/ovation_aurora_latest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[64.8, -147.7, 40]])))
        .mount(&server)
        .await;

    let snapshot = refresh_dashboard(&fetcher(), &endpoints(&server), QuakeWindow::Day).await;

    assert!(snapshot.quakes.is_ok());
    assert!(snapshot.flares.is_ok());
    assert!(matches!(
        snapshot.alerts,
        Err(FeedError::Http { status: 503, .. })
    ));
    assert!(!snapshot.aurora.is_fallback());

    let failures = snapshot.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "alerts");

    let summary = snapshot.summary();
    assert_eq!(summary.largest_magnitude, Some(6.4));
    assert_eq!(summary.quake_status(), "Strong quake observed");
    assert_eq!(summary.alert_count, 0);
    assert_eq!(summary.peak_flux, Some(1.1e-5));

    let events = snapshot.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].text, "M6.4 quake - 120 km SW of Adak, Alaska");
}
