//! Location resolution and weather refresh flow.
//!
//! Decides, on load and on user input, which location to query, keeps the
//! persisted last-location in sync with what is displayed, and owns the
//! screen's view state. All effects run as a sequential chain (state change
//! -> city list -> weather); nothing is fanned out concurrently.
//!
//! Every weather fetch takes a monotonic token. A state change or a newer
//! fetch bumps the sequence, so a superseded response is discarded instead
//! of overwriting a newer selection.

use crate::error::ErrorNotice;
use crate::geolocation::{GeolocationProvider, PermissionStatus};
use crate::models::{CityOption, LocationSelection, WeatherSnapshot};
use crate::regions::RegionDirectoryClient;
use crate::store::LocationStore;
use crate::weather::WeatherClient;
use crate::Result;
use tracing::{debug, warn};

/// Everything the screen renders, owned by the flow. No ambient globals.
#[derive(Debug, Default)]
pub struct ViewState {
    /// A fetch is in flight
    pub loading: bool,
    /// Last successful fetch; replaced wholesale, never merged
    pub snapshot: Option<WeatherSnapshot>,
    /// Selected state code, if any
    pub selected_uf: Option<String>,
    /// Selected city name; only meaningful with `selected_uf`
    pub selected_city: Option<String>,
    /// City options for the selected state
    pub cities: Vec<CityOption>,
    /// Location picker panel visibility
    pub picker_open: bool,
    /// Label shown in the location bar
    pub location_label: Option<String>,
    /// Most recent failure, surfaced to the presentation layer
    pub notice: Option<ErrorNotice>,
}

/// Monotonic fetch sequence. A response is applied only when its token is
/// still the latest one issued.
#[derive(Debug, Default)]
struct FetchSequence(u64);

impl FetchSequence {
    fn begin(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    fn invalidate(&mut self) {
        self.0 += 1;
    }

    fn is_current(&self, token: u64) -> bool {
        token == self.0
    }
}

/// Orchestrates geolocation, the weather and directory clients, and the
/// last-location store for one screen instance.
pub struct LocationFlow {
    weather: WeatherClient,
    regions: RegionDirectoryClient,
    store: LocationStore,
    geolocation: Box<dyn GeolocationProvider>,
    state: ViewState,
    fetches: FetchSequence,
}

impl LocationFlow {
    pub fn new(
        weather: WeatherClient,
        regions: RegionDirectoryClient,
        store: LocationStore,
        geolocation: Box<dyn GeolocationProvider>,
    ) -> Self {
        Self {
            weather,
            regions,
            store,
            geolocation,
            state: ViewState::default(),
            fetches: FetchSequence::default(),
        }
    }

    /// Current view state for rendering.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Toggle the location picker panel.
    pub fn toggle_picker(&mut self) {
        self.state.picker_open = !self.state.picker_open;
    }

    /// Runs once per screen activation: geolocate when permitted, otherwise
    /// fall back to the persisted selection. With neither available the
    /// screen settles in a stable unresolved state.
    pub async fn initial_resolve(&mut self) {
        self.state.loading = true;
        if let Err(err) = self.try_initial_resolve().await {
            warn!(error = %err, "initial location resolution failed");
            self.state.notice = Some(ErrorNotice::from(&err));
            self.state.loading = false;
        }
    }

    async fn try_initial_resolve(&mut self) -> Result<()> {
        match self.geolocation.request_permission().await? {
            PermissionStatus::Granted => {
                let position = self.geolocation.current_position().await?;
                self.resolve_by_coordinates(position.latitude, position.longitude)
                    .await;
            }
            PermissionStatus::Denied => {
                debug!("location permission denied, falling back to stored selection");
                match self.store.load().await? {
                    Some(selection) => {
                        self.state.selected_uf = Some(selection.uf.clone());
                        self.state.selected_city = Some(selection.city.clone());
                        self.resolve_by_city(&selection.uf, &selection.city).await;
                    }
                    None => {
                        // Nothing to show until the user picks a location.
                        self.state.loading = false;
                    }
                }
            }
        }
        Ok(())
    }

    /// Fetch weather for a coordinate pair and persist the location the
    /// response resolves to.
    pub async fn resolve_by_coordinates(&mut self, latitude: f64, longitude: f64) {
        let token = self.fetches.begin();
        self.state.loading = true;

        match self.weather.fetch_by_coordinates(latitude, longitude).await {
            Ok(snapshot) => {
                if !self.fetches.is_current(token) {
                    debug!("discarding superseded coordinate fetch");
                    return;
                }
                // The label split is format-dependent; skip persistence
                // rather than store a wrong pair.
                match LocationSelection::from_label(&snapshot.location_label, &snapshot.city_name)
                {
                    Some(selection) => {
                        self.state.selected_uf = Some(selection.uf.clone());
                        self.state.selected_city = Some(selection.city.clone());
                        self.persist(selection).await;
                    }
                    None => warn!(
                        label = %snapshot.location_label,
                        "could not derive state/city from location label"
                    ),
                }
                self.apply_snapshot(snapshot);
            }
            Err(err) => self.fail_fetch(token, &err),
        }
    }

    /// Fetch weather for an explicit state/city pair. No-op unless both
    /// parts are non-empty. Persists the pair verbatim on success.
    pub async fn resolve_by_city(&mut self, uf: &str, city: &str) {
        if uf.is_empty() || city.is_empty() {
            return;
        }
        self.state.selected_uf = Some(uf.to_string());
        self.state.selected_city = Some(city.to_string());

        let token = self.fetches.begin();
        self.state.loading = true;
        let query = format!("{city},{uf}");

        match self.weather.fetch_by_city(&query).await {
            Ok(mut snapshot) => {
                if !self.fetches.is_current(token) {
                    debug!(query, "discarding superseded city fetch");
                    return;
                }
                snapshot.location_label = format!("{city}, {uf}");
                self.persist(LocationSelection::new(uf, city)).await;
                self.apply_snapshot(snapshot);
            }
            Err(err) => self.fail_fetch(token, &err),
        }
    }

    /// A new state clears the dependent city selection and list, supersedes
    /// any in-flight weather fetch, and loads the city list for the state.
    pub async fn on_state_changed(&mut self, uf: &str) {
        self.state.selected_uf = Some(uf.to_string());
        self.state.selected_city = None;
        self.state.cities.clear();
        self.fetches.invalidate();

        self.state.loading = true;
        match self.regions.list_cities(uf).await {
            Ok(cities) => {
                debug!(uf, count = cities.len(), "city list loaded");
                self.state.cities = cities;
                self.state.notice = None;
            }
            Err(err) => {
                warn!(uf, error = %err, "failed to fetch city list");
                self.state.notice = Some(ErrorNotice::from(&err));
            }
        }
        self.state.loading = false;
    }

    /// Once both state and city are set, fetch weather and close the picker.
    pub async fn on_city_changed(&mut self, city: &str) {
        self.state.selected_city = Some(city.to_string());
        if let Some(uf) = self.state.selected_uf.clone() {
            let city = city.to_string();
            self.resolve_by_city(&uf, &city).await;
            self.state.picker_open = false;
        }
    }

    /// Re-fetch for the current selection, or rerun the initial resolution
    /// when nothing is selected yet.
    pub async fn refresh(&mut self) {
        match (
            self.state.selected_uf.clone(),
            self.state.selected_city.clone(),
        ) {
            (Some(uf), Some(city)) if !uf.is_empty() && !city.is_empty() => {
                self.resolve_by_city(&uf, &city).await;
            }
            _ => self.initial_resolve().await,
        }
    }

    fn apply_snapshot(&mut self, snapshot: WeatherSnapshot) {
        self.state.location_label = Some(snapshot.location_label.clone());
        self.state.snapshot = Some(snapshot);
        self.state.notice = None;
        self.state.loading = false;
    }

    fn fail_fetch(&mut self, token: u64, err: &crate::TempoError) {
        warn!(error = %err, "weather fetch failed");
        if self.fetches.is_current(token) {
            self.state.notice = Some(ErrorNotice::from(err));
            self.state.loading = false;
        }
    }

    async fn persist(&mut self, selection: LocationSelection) {
        if let Err(err) = self.store.save(&selection).await {
            // A failed write only costs the next cold start its fallback.
            warn!(error = %err, "failed to persist last location");
        }
    }
}
