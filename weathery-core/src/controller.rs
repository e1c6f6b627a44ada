//! Dashboard state machine.
//!
//! Each location change, refresh or credential save starts a fetch cycle and
//! bumps a generation counter. A cycle only writes its result back if its
//! generation is still the latest one, so a slow response for a city the user
//! already left never overwrites the newer one.

use chrono::FixedOffset;
use parking_lot::RwLock;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    config::{Config, DEFAULT_ICON_URL_TEMPLATE},
    credential::CredentialResolver,
    error::WeatherError,
    fallback::{fallback_chart_series, fallback_daily_forecast},
    gateway::WeatherGateway,
    location::{DEFAULT_LOCATION_ID, Location, resolve_location},
    model::{CurrentConditions, DashboardStatus, ForecastSeries, ViewState},
    normalize::{series_offset, to_chart_series, to_daily_forecast},
};

const MISSING_KEY_MESSAGE: &str =
    "OpenWeather API key is missing. Set OPENWEATHER_API_KEY or save a key to continue.";

#[derive(Debug)]
pub struct DashboardController {
    gateway: Arc<dyn WeatherGateway>,
    credentials: Arc<CredentialResolver>,
    icon_template: String,
    timezone: Option<FixedOffset>,
    generation: AtomicU64,
    state: RwLock<ViewState>,
}

impl DashboardController {
    pub fn new(gateway: Arc<dyn WeatherGateway>, credentials: Arc<CredentialResolver>) -> Self {
        Self {
            gateway,
            credentials,
            icon_template: DEFAULT_ICON_URL_TEMPLATE.to_string(),
            timezone: None,
            generation: AtomicU64::new(0),
            state: RwLock::new(initial_state(DEFAULT_LOCATION_ID)),
        }
    }

    pub fn from_config(
        config: &Config,
        gateway: Arc<dyn WeatherGateway>,
        credentials: Arc<CredentialResolver>,
    ) -> Self {
        let location = resolve_location(&config.default_location);

        Self {
            icon_template: config.icon_url_template.clone(),
            timezone: config.timezone_override(),
            state: RwLock::new(initial_state(location.id)),
            ..Self::new(gateway, credentials)
        }
    }

    /// Bucket forecast days in `offset` instead of the city's own offset.
    pub fn with_timezone(mut self, offset: FixedOffset) -> Self {
        self.timezone = Some(offset);
        self
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.read().clone()
    }

    /// Select a city and fetch its weather. Unknown ids fall back to Manila.
    pub async fn change_location(&self, id: &str) -> ViewState {
        let location = resolve_location(id);
        if location.id != id {
            tracing::warn!(requested = id, fallback = location.id, "unknown city id");
        }

        self.run_cycle(location).await
    }

    /// Re-fetch the selected city.
    pub async fn refresh(&self) -> ViewState {
        let selected = self.state.read().selected_location_id.clone();
        self.run_cycle(resolve_location(&selected)).await
    }

    /// Store a new API key override and retry. Blank input changes nothing.
    pub async fn save_credential(&self, api_key: &str) -> ViewState {
        if api_key.trim().is_empty() {
            return self.snapshot();
        }

        self.credentials.persist(api_key);
        tracing::info!("saved API key override, retrying");
        self.refresh().await
    }

    async fn run_cycle(&self, location: &'static Location) -> ViewState {
        let generation = self.begin_cycle(location);

        let (current, forecast) = tokio::join!(
            self.gateway.fetch_current(location),
            self.gateway.fetch_forecast(location),
        );

        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(city = location.id, generation, "discarding superseded fetch result");
            return state.clone();
        }

        self.apply(&mut state, current, forecast);
        tracing::info!(city = location.id, status = ?state.status, "fetch cycle finished");
        state.clone()
    }

    fn begin_cycle(&self, location: &Location) -> u64 {
        let mut state = self.state.write();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        state.selected_location_id = location.id.to_string();
        state.status = DashboardStatus::Loading;
        state.loading = true;
        state.error_message = None;
        state.failure = None;

        generation
    }

    fn apply(
        &self,
        state: &mut ViewState,
        current: Result<CurrentConditions, WeatherError>,
        forecast: Result<ForecastSeries, WeatherError>,
    ) {
        state.loading = false;

        let current = match current {
            Ok(current) => current,
            Err(err) => {
                tracing::warn!(error = %err, "current weather fetch failed");
                let message = if err.is_missing_credential() {
                    MISSING_KEY_MESSAGE.to_string()
                } else {
                    format!("Current weather error: {err}")
                };
                credential_missing(state, message, &err);
                return;
            }
        };

        match forecast {
            Ok(forecast) => {
                let tz = self.timezone.unwrap_or_else(|| series_offset(&forecast));
                state.chart_series = to_chart_series(&forecast, &tz);
                state.daily_forecast = to_daily_forecast(&forecast, &tz, &self.icon_template);
                state.current_conditions = Some(current);
                state.status = DashboardStatus::Ready;
                state.error_message = None;
                state.failure = None;
                state.api_key_valid = true;
            }
            Err(err) if err.is_missing_credential() => {
                credential_missing(state, MISSING_KEY_MESSAGE.to_string(), &err);
            }
            Err(err) => {
                tracing::warn!(error = %err, "forecast fetch failed, keeping previous forecast");
                state.current_conditions = Some(current);
                state.status = DashboardStatus::ReadyWithWarning;
                state.error_message = Some(format!("Forecast error: {err}"));
                state.failure = Some(err.kind());
                state.api_key_valid = true;
            }
        }
    }
}

fn credential_missing(state: &mut ViewState, message: String, err: &WeatherError) {
    state.current_conditions = None;
    state.status = DashboardStatus::CredentialMissing;
    state.error_message = Some(message);
    state.failure = Some(err.kind());
    state.api_key_valid = false;
}

fn initial_state(location_id: &str) -> ViewState {
    ViewState {
        selected_location_id: location_id.to_string(),
        status: DashboardStatus::Idle,
        current_conditions: None,
        chart_series: fallback_chart_series(),
        daily_forecast: fallback_daily_forecast(),
        loading: false,
        error_message: None,
        failure: None,
        api_key_valid: true,
    }
}
