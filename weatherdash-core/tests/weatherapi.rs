//! WeatherAPI.com client and dashboard flow against a mock server.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weatherdash_core::{
    AstronomyDate, Dashboard, FetchError, FixedPosition, LocationQuery, SectionOutcome,
    WeatherApiClient, WeatherSource,
};

fn forecast_body() -> serde_json::Value {
    let hours: Vec<_> = (0..24)
        .map(|h| {
            json!({
                "time": format!("2024-03-27 {h:02}:00"),
                "temp_c": 20.0 + f64::from(h) / 2.0,
                "condition": { "icon": format!("//cdn.weatherapi.com/weather/64x64/day/{h}.png") }
            })
        })
        .collect();

    let days: Vec<_> = (25..=31)
        .map(|d| {
            json!({
                "date": format!("2024-03-{d}"),
                "day": {
                    "maxtemp_c": 30.0 + f64::from(d - 25),
                    "mintemp_c": 18.2,
                    "condition": { "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png" }
                },
                "hour": if d == 27 { hours.clone() } else { Vec::new() }
            })
        })
        .collect();

    json!({
        "location": { "name": "New Delhi", "localtime": "2024-03-27 14:20" },
        "current": {
            "temp_c": 31.4,
            "last_updated": "2024-03-27 14:15",
            "condition": { "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png" }
        },
        "forecast": { "forecastday": days }
    })
}

fn astronomy_body() -> serde_json::Value {
    json!({
        "location": { "name": "New Delhi", "localtime": "2024-03-27 14:20" },
        "astronomy": { "astro": {
            "sunrise": "06:16 AM",
            "sunset": "06:36 PM",
            "moonrise": "08:51 PM",
            "moonset": "07:40 AM",
            "moon_phase": "Waning Gibbous",
            "is_sun_up": 1
        }}
    })
}

fn client(server: &MockServer) -> WeatherApiClient {
    WeatherApiClient::builder("TEST_KEY")
        .base_url(format!("{}/v1", server.uri()))
        .build()
        .unwrap()
}

fn query(s: &str) -> LocationQuery {
    LocationQuery::from_search(s).unwrap()
}

#[tokio::test]
async fn forecast_sends_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("key", "TEST_KEY"))
        .and(query_param("q", "28.6139,77.209"))
        .and(query_param("days", "7"))
        .and(query_param("aqi", "no"))
        .and(query_param("alerts", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client(&server).fetch_forecast(&query("28.6139,77.209")).await.unwrap();

    assert_eq!(snapshot.location_name, "New Delhi");
    assert_eq!(snapshot.days.len(), 7);
    assert_eq!(snapshot.days[2].hours.len(), 24);
}

#[tokio::test]
async fn astronomy_sends_date() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/astronomy.json"))
        .and(query_param("q", "Hong Kong"))
        .and(query_param("dt", "2024-03-27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(astronomy_body()))
        .expect(1)
        .mount(&server)
        .await;

    let date = NaiveDate::from_ymd_opt(2024, 3, 27).unwrap();
    let astro = client(&server).fetch_astronomy(&query("Hong Kong"), date).await.unwrap();

    assert_eq!(astro.moon_phase, "Waning Gibbous");
    assert!(astro.is_sun_up);
}

#[tokio::test]
async fn non_success_status_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&server)
        .await;

    let err = client(&server).fetch_forecast(&query("Atlantis")).await.unwrap_err();

    match err {
        FetchError::Http { status, ref body, .. } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("No matching location found."));
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/astronomy.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let date = NaiveDate::from_ymd_opt(2024, 3, 27).unwrap();
    let err = client(&server).fetch_astronomy(&query("Paris"), date).await.unwrap_err();

    assert!(matches!(err, FetchError::Parse { .. }));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let server = MockServer::start().await;
    let base = format!("{}/v1", server.uri());
    drop(server);

    let client = WeatherApiClient::builder("TEST_KEY").base_url(base).build().unwrap();
    let err = client.fetch_forecast(&query("Paris")).await.unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }));
}

#[tokio::test]
async fn dashboard_renders_mocked_payloads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/astronomy.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(astronomy_body()))
        .mount(&server)
        .await;

    let date = NaiveDate::from_ymd_opt(2024, 3, 27).unwrap();
    let dash = Dashboard::new(Box::new(client(&server)), LocationQuery::fallback())
        .with_astronomy_date(AstronomyDate::Fixed(date));

    let report = dash.load(&FixedPosition(None)).await;
    assert!(report.forecast.is_applied());
    assert!(report.astronomy.is_applied());

    let view = dash.view();
    assert_eq!(view.current.time.as_deref(), Some("2:20 PM • 27-Mar-2024"));
    assert_eq!(view.current.temperature.as_deref(), Some("31°C"));
    assert_eq!(view.hourly[1].label.as_deref(), Some("3 PM"));
    assert_eq!(view.hourly[6].label.as_deref(), Some("8 PM"));
    assert_eq!(view.weekly[0].weekday.as_deref(), Some("Wed"));
    assert_eq!(view.weekly[0].max.as_deref(), Some("32°"));
    assert_eq!(view.weekly[5].weekday.as_deref(), Some("Mon"));
    assert_eq!(view.moon.image.as_deref(), Some("assets/images/Waning Gibbous.png"));
    assert_eq!(view.sun.status.as_deref(), Some("Sunset in:"));
    assert_eq!(view.sun.timer.as_deref(), Some("4h 16m"));
}

#[tokio::test]
async fn astronomy_outage_leaves_forecast_intact() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/astronomy.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dash = Dashboard::new(Box::new(client(&server)), LocationQuery::fallback());
    let report = dash.search("New Delhi").unwrap().await;

    assert!(report.forecast.is_applied());
    assert!(matches!(report.astronomy, SectionOutcome::Failed(FetchError::Http { .. })));
    assert_eq!(report.alert(), None);
    assert!(dash.view().moon.phase.is_none());
}
