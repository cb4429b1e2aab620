//! Integration tests for the location-resolution and weather-refresh flow.
//!
//! Both remote endpoints are stood in by wiremock servers; the geolocation
//! capability is stubbed through the provider trait; the last-location store
//! lives in a temp directory.

use async_trait::async_trait;
use serde_json::json;
use tempo::config::{RegionsConfig, WeatherConfig};
use tempo::geolocation::{GeolocationProvider, PermissionStatus, Position};
use tempo::models::LocationSelection;
use tempo::regions::RegionDirectoryClient;
use tempo::resolver::LocationFlow;
use tempo::store::LocationStore;
use tempo::weather::WeatherClient;
use tempo::{ErrorKind, Result, TempoError};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct DeniedGeolocation;

#[async_trait]
impl GeolocationProvider for DeniedGeolocation {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Denied)
    }

    async fn current_position(&self) -> Result<Position> {
        Err(TempoError::geolocation("permission was denied"))
    }
}

struct GrantedAt(f64, f64);

#[async_trait]
impl GeolocationProvider for GrantedAt {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn current_position(&self) -> Result<Position> {
        Ok(Position {
            latitude: self.0,
            longitude: self.1,
        })
    }
}

struct Harness {
    store_dir: TempDir,
    weather: MockServer,
    regions: MockServer,
    flow: LocationFlow,
}

async fn harness(geolocation: Box<dyn GeolocationProvider>) -> Harness {
    let store_dir = tempfile::tempdir().unwrap();
    harness_in(store_dir, geolocation).await
}

async fn harness_in(store_dir: TempDir, geolocation: Box<dyn GeolocationProvider>) -> Harness {
    let weather = MockServer::start().await;
    let regions = MockServer::start().await;

    let store = LocationStore::open(store_dir.path()).unwrap();
    let weather_client = WeatherClient::new(&WeatherConfig {
        api_key: "test-key".to_string(),
        base_url: weather.uri(),
        timeout_seconds: 5,
    })
    .unwrap();
    let regions_client = RegionDirectoryClient::new(&RegionsConfig {
        base_url: regions.uri(),
        providers: "gov".to_string(),
        timeout_seconds: 5,
    })
    .unwrap();

    let flow = LocationFlow::new(weather_client, regions_client, store, geolocation);
    Harness {
        store_dir,
        weather,
        regions,
        flow,
    }
}

impl Harness {
    /// Reopen the store after dropping the flow, as a fresh session would.
    async fn persisted_selection(self) -> Option<LocationSelection> {
        drop(self.flow);
        let store = LocationStore::open(self.store_dir.path()).unwrap();
        store.load().await.unwrap()
    }
}

fn weather_body(label: &str, city_name: &str) -> serde_json::Value {
    json!({
        "results": {
            "temp": 24,
            "humidity": 68,
            "wind_speedy": "3.1 km/h",
            "condition_slug": "clear_day",
            "currently": "dia",
            "city": label,
            "city_name": city_name,
            "forecast": [
                {"date": "29/08", "weekday": "Sex", "condition": "clear_day",
                 "max": 27, "min": 16, "rain_probability": 10},
                {"date": "30/08", "weekday": "Sáb", "condition": "rain",
                 "max": 22, "min": 15, "rain_probability": 80}
            ]
        }
    })
}

#[tokio::test]
async fn resolve_by_city_issues_one_formatted_request_and_persists() {
    let mut harness = harness(Box::new(DeniedGeolocation)).await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("key", "test-key"))
        .and(query_param("city_name", "Niterói,RJ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Niterói, RJ", "Niterói")))
        .expect(1)
        .mount(&harness.weather)
        .await;

    harness.flow.resolve_by_city("RJ", "Niterói").await;

    let state = harness.flow.state();
    assert!(!state.loading);
    assert!(state.snapshot.is_some());
    assert_eq!(state.location_label.as_deref(), Some("Niterói, RJ"));

    let persisted = harness.persisted_selection().await;
    assert_eq!(persisted, Some(LocationSelection::new("RJ", "Niterói")));
}

#[tokio::test]
async fn resolve_by_city_is_a_noop_when_a_part_is_missing() {
    let mut harness = harness(Box::new(DeniedGeolocation)).await;

    harness.flow.resolve_by_city("", "Niterói").await;
    harness.flow.resolve_by_city("RJ", "").await;

    let state = harness.flow.state();
    assert!(!state.loading);
    assert!(state.snapshot.is_none());
    assert!(harness.weather.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn state_change_clears_city_before_requesting_the_new_list() {
    let mut harness = harness(Box::new(DeniedGeolocation)).await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(weather_body("São Paulo, SP", "São Paulo")),
        )
        .mount(&harness.weather)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ibge/municipios/v1/RJ"))
        .and(query_param("providers", "gov"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"nome": "Niterói", "codigo_ibge": "3303302"},
            {"nome": "Rio de Janeiro", "codigo_ibge": "3304557"}
        ])))
        .expect(1)
        .mount(&harness.regions)
        .await;

    harness.flow.resolve_by_city("SP", "São Paulo").await;
    assert_eq!(
        harness.flow.state().selected_city.as_deref(),
        Some("São Paulo")
    );

    harness.flow.on_state_changed("RJ").await;

    let state = harness.flow.state();
    assert_eq!(state.selected_uf.as_deref(), Some("RJ"));
    assert_eq!(state.selected_city, None);
    assert_eq!(state.cities.len(), 2);
    assert_eq!(state.cities[0].value, "Niterói");
    assert!(!state.loading);
}

#[tokio::test]
async fn permission_denied_without_saved_selection_settles_unresolved() {
    let mut harness = harness(Box::new(DeniedGeolocation)).await;

    harness.flow.initial_resolve().await;

    let state = harness.flow.state();
    assert!(!state.loading);
    assert!(state.snapshot.is_none());
    assert!(harness.weather.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn permission_denied_restores_saved_selection() {
    let store_dir = tempfile::tempdir().unwrap();
    {
        let store = LocationStore::open(store_dir.path()).unwrap();
        store
            .save(&LocationSelection::new("SP", "São Paulo"))
            .await
            .unwrap();
    }
    let mut harness = harness_in(store_dir, Box::new(DeniedGeolocation)).await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("city_name", "São Paulo,SP"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(weather_body("São Paulo, SP", "São Paulo")),
        )
        .expect(1)
        .mount(&harness.weather)
        .await;

    harness.flow.initial_resolve().await;

    let state = harness.flow.state();
    assert!(state.snapshot.is_some());
    assert_eq!(state.selected_uf.as_deref(), Some("SP"));
    assert_eq!(state.selected_city.as_deref(), Some("São Paulo"));
}

#[tokio::test]
async fn granted_permission_fetches_by_coordinates_and_persists_derived_pair() {
    let mut harness = harness(Box::new(GrantedAt(-23.55, -46.63))).await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("key", "test-key"))
        .and(query_param("lat", "-23.55"))
        .and(query_param("lon", "-46.63"))
        .and(query_param("user_ip", "remote"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(weather_body("São Paulo, SP", "São Paulo")),
        )
        .expect(1)
        .mount(&harness.weather)
        .await;

    harness.flow.initial_resolve().await;

    let state = harness.flow.state();
    assert!(state.snapshot.is_some());
    assert!(!state.loading);
    assert_eq!(state.location_label.as_deref(), Some("São Paulo, SP"));

    let persisted = harness.persisted_selection().await;
    assert_eq!(persisted, Some(LocationSelection::new("SP", "São Paulo")));
}

#[tokio::test]
async fn failed_fetch_clears_loading_and_keeps_prior_snapshot() {
    let mut harness = harness(Box::new(DeniedGeolocation)).await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&harness.weather)
        .await;

    harness.flow.resolve_by_city("RJ", "Niterói").await;

    let state = harness.flow.state();
    assert!(!state.loading);
    assert!(state.snapshot.is_none());
    let notice = state.notice.as_ref().expect("failure should be surfaced");
    assert_eq!(notice.kind, ErrorKind::Network);
}

#[tokio::test]
async fn malformed_body_is_surfaced_as_such() {
    let mut harness = harness(Box::new(DeniedGeolocation)).await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&harness.weather)
        .await;

    harness.flow.resolve_by_city("RJ", "Niterói").await;

    let state = harness.flow.state();
    assert!(!state.loading);
    assert!(state.snapshot.is_none());
    assert_eq!(
        state.notice.as_ref().map(|n| n.kind),
        Some(ErrorKind::MalformedResponse)
    );
}

#[tokio::test]
async fn picking_state_then_city_fires_one_request_each_and_closes_picker() {
    let mut harness = harness(Box::new(DeniedGeolocation)).await;

    Mock::given(method("GET"))
        .and(path("/api/ibge/municipios/v1/RJ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"nome": "Niterói", "codigo_ibge": "3303302"}
        ])))
        .expect(1)
        .mount(&harness.regions)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("city_name", "Niterói,RJ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Niterói, RJ", "Niterói")))
        .expect(1)
        .mount(&harness.weather)
        .await;

    harness.flow.toggle_picker();
    assert!(harness.flow.state().picker_open);

    harness.flow.on_state_changed("RJ").await;
    harness.flow.on_city_changed("Niterói").await;

    let state = harness.flow.state();
    assert!(!state.picker_open);
    assert!(state.snapshot.is_some());
    assert_eq!(state.location_label.as_deref(), Some("Niterói, RJ"));
}

#[tokio::test]
async fn city_pick_without_state_keeps_picker_open_and_fetches_nothing() {
    let mut harness = harness(Box::new(DeniedGeolocation)).await;

    harness.flow.toggle_picker();
    harness.flow.on_city_changed("Niterói").await;

    let state = harness.flow.state();
    assert!(state.picker_open);
    assert!(state.snapshot.is_none());
    assert!(harness.weather.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn directory_failure_is_surfaced_and_list_stays_empty() {
    let mut harness = harness(Box::new(DeniedGeolocation)).await;

    Mock::given(method("GET"))
        .and(path("/api/ibge/municipios/v1/RJ"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&harness.regions)
        .await;

    harness.flow.on_state_changed("RJ").await;

    let state = harness.flow.state();
    assert!(!state.loading);
    assert!(state.cities.is_empty());
    assert_eq!(state.selected_city, None);
    assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(ErrorKind::Network));
}
