use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use std::{sync::Arc, time::Duration};

use crate::{
    config::{Config, DEFAULT_BASE_URL},
    credential::CredentialResolver,
    error::WeatherError,
    location::Location,
    model::{CurrentConditions, ForecastPoint, ForecastSeries},
};

use super::WeatherGateway;

/// OpenWeatherMap 2.5 client, queried by coordinates in metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    base_url: String,
    credentials: Arc<CredentialResolver>,
    http: Client,
}

impl OpenWeatherGateway {
    pub fn new(credentials: Arc<CredentialResolver>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, WeatherError> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn from_config(config: &Config, credentials: Arc<CredentialResolver>) -> Result<Self, WeatherError> {
        let gateway = Self::new(credentials).with_base_url(config.base_url.clone());

        match config.request_timeout() {
            Some(timeout) => gateway.with_timeout(timeout),
            None => Ok(gateway),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &Location,
    ) -> Result<T, WeatherError> {
        let api_key = self.credentials.resolve();
        if api_key.is_empty() {
            return Err(WeatherError::MissingCredential);
        }

        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(
            url = %url,
            lat = location.lat,
            lon = location.lon,
            appid = "API_KEY_HIDDEN",
            "fetching {endpoint}"
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("units", "metric".to_string()),
                ("appid", api_key),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), endpoint, "OpenWeather request failed");
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|err| WeatherError::Decode(err.to_string()))
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    async fn fetch_current(&self, location: &Location) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", location).await?;
        Ok(parsed.into())
    }

    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastSeries, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", location).await?;
        Ok(parsed.into())
    }
}

// Every field is lenient: a missing, null or mistyped value shows up as
// zero/empty on screen rather than failing the whole fetch. Numbers are read
// as f64 and narrowed afterwards.

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwMain {
    #[serde(deserialize_with = "lenient")]
    temp: f64,
    #[serde(deserialize_with = "lenient")]
    feels_like: f64,
    #[serde(deserialize_with = "lenient")]
    temp_min: f64,
    #[serde(deserialize_with = "lenient")]
    temp_max: f64,
    #[serde(deserialize_with = "lenient")]
    pressure: f64,
    #[serde(deserialize_with = "lenient")]
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    #[serde(deserialize_with = "lenient")]
    main: String,
    #[serde(deserialize_with = "lenient")]
    description: String,
    #[serde(deserialize_with = "lenient")]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWind {
    #[serde(deserialize_with = "lenient")]
    speed: f64,
    #[serde(deserialize_with = "lenient")]
    deg: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwSys {
    #[serde(deserialize_with = "lenient")]
    country: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCurrentResponse {
    #[serde(deserialize_with = "lenient")]
    name: String,
    #[serde(deserialize_with = "lenient")]
    dt: f64,
    #[serde(deserialize_with = "lenient")]
    timezone: f64,
    #[serde(deserialize_with = "lenient")]
    visibility: f64,
    #[serde(deserialize_with = "lenient")]
    main: OwMain,
    #[serde(deserialize_with = "lenient")]
    weather: Vec<OwWeather>,
    #[serde(deserialize_with = "lenient")]
    wind: OwWind,
    #[serde(deserialize_with = "lenient")]
    sys: OwSys,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCity {
    #[serde(deserialize_with = "lenient")]
    name: String,
    #[serde(deserialize_with = "lenient")]
    timezone: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwForecastEntry {
    #[serde(deserialize_with = "lenient")]
    dt: f64,
    #[serde(deserialize_with = "lenient")]
    main: OwMain,
    #[serde(deserialize_with = "lenient")]
    weather: Vec<OwWeather>,
    #[serde(deserialize_with = "lenient")]
    pop: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwForecastResponse {
    #[serde(deserialize_with = "lenient")]
    city: OwCity,
    #[serde(deserialize_with = "lenient")]
    list: Vec<OwForecastEntry>,
}

// `as` saturates on out-of-range floats and maps NaN to zero.
fn narrow_u8(value: f64) -> u8 {
    value.round() as u8
}

fn narrow_u32(value: f64) -> u32 {
    value.round() as u32
}

fn narrow_i32(value: f64) -> i32 {
    value.round() as i32
}

fn narrow_i64(value: f64) -> i64 {
    value.round() as i64
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(res: OwCurrentResponse) -> Self {
        let weather = res.weather.into_iter().next().unwrap_or_default();

        CurrentConditions {
            temperature: res.main.temp,
            feels_like: res.main.feels_like,
            temp_min: res.main.temp_min,
            temp_max: res.main.temp_max,
            humidity: narrow_u8(res.main.humidity),
            pressure: narrow_u32(res.main.pressure),
            wind_speed: res.wind.speed,
            wind_direction_deg: res.wind.deg,
            visibility_meters: narrow_u32(res.visibility),
            condition_main: weather.main,
            condition_description: weather.description,
            condition_icon_code: weather.icon,
            location_name: res.name,
            country: res.sys.country,
            observed_at: narrow_i64(res.dt),
            timezone_offset_secs: narrow_i32(res.timezone),
        }
    }
}

impl From<OwForecastResponse> for ForecastSeries {
    fn from(res: OwForecastResponse) -> Self {
        let points = res
            .list
            .into_iter()
            .map(|entry| {
                let weather = entry.weather.into_iter().next().unwrap_or_default();
                ForecastPoint {
                    epoch_seconds: narrow_i64(entry.dt),
                    temperature: entry.main.temp,
                    temp_min: entry.main.temp_min,
                    temp_max: entry.main.temp_max,
                    condition_icon_code: weather.icon,
                    condition_description: weather.description,
                    precipitation_probability: entry.pop,
                }
            })
            .collect();

        ForecastSeries {
            city_name: res.city.name,
            timezone_offset_secs: narrow_i32(res.city.timezone),
            points,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_payload_maps_to_conditions() {
        let json = r#"{
            "coord": {"lat": 14.5995, "lon": 120.9842},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 31.7, "feels_like": 36.2, "temp_min": 30.1, "temp_max": 32.4,
                     "pressure": 1008, "humidity": 74},
            "visibility": 10000,
            "wind": {"speed": 3.6, "deg": 230},
            "clouds": {"all": 75},
            "dt": 1712205600,
            "sys": {"country": "PH", "sunrise": 1712180000, "sunset": 1712224000},
            "timezone": 28800,
            "name": "Manila"
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).expect("valid payload");
        let current = CurrentConditions::from(parsed);

        assert_eq!(current.temperature, 31.7);
        assert_eq!(current.humidity, 74);
        assert_eq!(current.pressure, 1008);
        assert_eq!(current.condition_main, "Rain");
        assert_eq!(current.condition_icon_code, "10d");
        assert_eq!(current.location_name, "Manila");
        assert_eq!(current.country, "PH");
        assert_eq!(current.visibility_meters, 10000);
        assert_eq!(current.timezone_offset_secs, 28800);
    }

    #[test]
    fn sparse_payload_decodes_with_defaults() {
        let parsed: OwCurrentResponse =
            serde_json::from_str(r#"{"name": "Cebu City"}"#).expect("sparse payload");
        let current = CurrentConditions::from(parsed);

        assert_eq!(current.location_name, "Cebu City");
        assert_eq!(current.temperature, 0.0);
        assert!(current.condition_description.is_empty());
    }

    #[test]
    fn forecast_payload_keeps_arrival_order() {
        let json = r#"{
            "list": [
                {"dt": 1712210400, "main": {"temp": 30.2, "temp_min": 29.0, "temp_max": 31.0},
                 "weather": [{"main": "Clouds", "description": "few clouds", "icon": "02d"}], "pop": 0.1},
                {"dt": 1712221200, "main": {"temp": 28.4, "temp_min": 28.0, "temp_max": 29.0},
                 "weather": [], "pop": 0}
            ],
            "city": {"name": "Manila", "timezone": 28800}
        }"#;

        let parsed: OwForecastResponse = serde_json::from_str(json).expect("valid payload");
        let series = ForecastSeries::from(parsed);

        assert_eq!(series.city_name, "Manila");
        assert_eq!(series.timezone_offset_secs, 28800);
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].epoch_seconds, 1712210400);
        assert_eq!(series.points[0].condition_icon_code, "02d");
        assert_eq!(series.points[0].precipitation_probability, 0.1);
        assert!(series.points[1].condition_icon_code.is_empty());
    }

    #[test]
    fn null_and_mistyped_fields_fall_back_to_defaults() {
        let json = r#"{
            "weather": null,
            "main": {"temp": 29.4, "humidity": null, "pressure": 1008.5, "feels_like": "hot"},
            "visibility": "far",
            "wind": null,
            "dt": 1712205600,
            "timezone": 28800.0,
            "name": 42
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).expect("lenient payload");
        let current = CurrentConditions::from(parsed);

        assert_eq!(current.temperature, 29.4);
        assert_eq!(current.humidity, 0);
        assert_eq!(current.pressure, 1009);
        assert_eq!(current.feels_like, 0.0);
        assert_eq!(current.visibility_meters, 0);
        assert_eq!(current.wind_speed, 0.0);
        assert_eq!(current.timezone_offset_secs, 28800);
        assert!(current.location_name.is_empty());
        assert!(current.condition_icon_code.is_empty());
    }

    #[test]
    fn forecast_entries_tolerate_null_fields() {
        let json = r#"{
            "list": [
                {"dt": 1712210400, "main": null, "weather": null, "pop": null},
                {"dt": 1712221200.0, "main": {"temp": 28.4}, "weather": [{"icon": 3}], "pop": "high"}
            ],
            "city": {"name": null, "timezone": "+08:00"}
        }"#;

        let parsed: OwForecastResponse = serde_json::from_str(json).expect("lenient payload");
        let series = ForecastSeries::from(parsed);

        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].temperature, 0.0);
        assert_eq!(series.points[0].precipitation_probability, 0.0);
        assert_eq!(series.points[1].epoch_seconds, 1712221200);
        assert_eq!(series.points[1].temperature, 28.4);
        assert!(series.points[1].condition_icon_code.is_empty());
        assert!(series.city_name.is_empty());
        assert_eq!(series.timezone_offset_secs, 0);
    }

    #[test]
    fn non_json_body_still_fails() {
        assert!(serde_json::from_str::<OwCurrentResponse>("<html>oops</html>").is_err());
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_body("short"), "short");
    }
}
