use serde::{Deserialize, Serialize};

use crate::error::FailureKind;

/// Snapshot of current conditions at a location, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
    /// Metres per second.
    pub wind_speed: f64,
    pub wind_direction_deg: f64,
    pub visibility_meters: u32,
    pub condition_main: String,
    pub condition_description: String,
    pub condition_icon_code: String,
    pub location_name: String,
    pub country: String,
    pub observed_at: i64,
    pub timezone_offset_secs: i32,
}

/// One 3-hourly sample of the forecast time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub epoch_seconds: i64,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition_icon_code: String,
    pub condition_description: String,
    /// 0.0 ..= 1.0
    pub precipitation_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub city_name: String,
    pub timezone_offset_secs: i32,
    pub points: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub temp: i64,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub day_label: String,
    pub date_label: String,
    pub icon_url: String,
    /// Rounded degrees Celsius.
    pub temperature: i64,
    pub description: String,
    pub precipitation_percent: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardStatus {
    Idle,
    Loading,
    Ready,
    ReadyWithWarning,
    CredentialMissing,
}

/// Everything the presentation layer needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub selected_location_id: String,
    pub status: DashboardStatus,
    pub current_conditions: Option<CurrentConditions>,
    pub chart_series: Vec<ChartPoint>,
    pub daily_forecast: Vec<DailyForecastEntry>,
    pub loading: bool,
    pub error_message: Option<String>,
    /// Underlying failure behind `error_message`, if any.
    pub failure: Option<FailureKind>,
    pub api_key_valid: bool,
}
