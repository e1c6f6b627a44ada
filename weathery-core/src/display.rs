//! Display-ready values derived from the view state: summary cards, alerts,
//! compass directions and weather-map links.

use serde::Serialize;

use crate::{location::Location, model::CurrentConditions, normalize::round_temp};

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

pub const MAP_URL_BASE: &str = "https://openweathermap.org/weathermap";

/// Overlay layers offered by the weather map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MapLayer {
    #[default]
    Temperature,
    Precipitation,
    Clouds,
    Wind,
    Pressure,
}

impl MapLayer {
    pub const fn all() -> &'static [MapLayer] {
        &[
            MapLayer::Temperature,
            MapLayer::Precipitation,
            MapLayer::Clouds,
            MapLayer::Wind,
            MapLayer::Pressure,
        ]
    }

    pub fn layer_id(&self) -> &'static str {
        match self {
            MapLayer::Temperature => "temp_new",
            MapLayer::Precipitation => "precipitation_new",
            MapLayer::Clouds => "clouds_new",
            MapLayer::Wind => "wind_new",
            MapLayer::Pressure => "pressure_new",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MapLayer::Temperature => "Temperature",
            MapLayer::Precipitation => "Precipitation",
            MapLayer::Clouds => "Clouds",
            MapLayer::Wind => "Wind",
            MapLayer::Pressure => "Pressure",
        }
    }
}

impl std::fmt::Display for MapLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.layer_id())
    }
}

impl TryFrom<&str> for MapLayer {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        MapLayer::all()
            .iter()
            .copied()
            .find(|layer| layer.layer_id() == lower || layer.name().to_lowercase() == lower)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown map layer '{value}'. Supported layers: temp_new, precipitation_new, \
                     clouds_new, wind_new, pressure_new."
                )
            })
    }
}

pub fn map_url(location: &Location, layer: MapLayer, zoom: u8) -> String {
    format!(
        "{MAP_URL_BASE}?basemap=map&cities=true&layer={}&lat={}&lon={}&zoom={zoom}",
        layer.layer_id(),
        location.lat,
        location.lon,
    )
}

/// 8-point compass direction for a bearing in degrees.
pub fn wind_direction(degrees: f64) -> &'static str {
    let index = (degrees / 45.0).round() as i64;
    COMPASS[index.rem_euclid(8) as usize]
}

pub fn visibility_description(meters: u32) -> &'static str {
    match meters {
        10_000.. => "Excellent",
        5_000.. => "Good",
        2_000.. => "Moderate",
        _ => "Poor",
    }
}

pub fn humidity_description(humidity: u8) -> &'static str {
    if humidity > 70 { "High humidity" } else { "Normal humidity" }
}

/// m/s to rounded km/h.
pub fn wind_speed_kmh(meters_per_second: f64) -> i64 {
    (meters_per_second * 3.6).round() as i64
}

/// Symbolic icon name for an API condition group such as `Rain` or `Clouds`.
pub fn condition_icon_name(condition_main: &str) -> &'static str {
    match condition_main {
        "Clear" => "sun",
        "Clouds" => "cloud",
        "Rain" => "cloud-rain",
        "Drizzle" => "cloud-drizzle",
        "Thunderstorm" => "cloud-lightning",
        "Snow" => "cloud-snow",
        "Mist" | "Smoke" | "Haze" | "Fog" => "cloud-fog",
        "Dust" | "Sand" | "Ash" | "Squall" | "Tornado" => "wind",
        _ => "cloud",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub description: String,
}

impl SummaryCard {
    fn new(title: &'static str, value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title,
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Temperature, humidity, wind and visibility cards. Placeholder values are
/// used when there are no current conditions.
pub fn summary_cards(current: Option<&CurrentConditions>) -> [SummaryCard; 4] {
    match current {
        Some(c) => [
            SummaryCard::new(
                "Temperature",
                format!("{}°C", round_temp(c.temperature)),
                format!("Feels like {}°C", round_temp(c.feels_like)),
            ),
            SummaryCard::new(
                "Humidity",
                format!("{}%", c.humidity),
                humidity_description(c.humidity),
            ),
            SummaryCard::new(
                "Wind Speed",
                format!("{} km/h", wind_speed_kmh(c.wind_speed)),
                format!("Direction: {}", wind_direction(c.wind_direction_deg)),
            ),
            SummaryCard::new(
                "Visibility",
                format!("{} km", (f64::from(c.visibility_meters) / 1000.0).round() as i64),
                visibility_description(c.visibility_meters),
            ),
        ],
        None => [
            SummaryCard::new("Temperature", "32°C", "Feels like 35°C"),
            SummaryCard::new("Humidity", "78%", "High humidity"),
            SummaryCard::new("Wind Speed", "12 km/h", "Direction: NE"),
            SummaryCard::new("Visibility", "10 km", "Excellent"),
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherAlert {
    pub title: &'static str,
    pub description: String,
    pub severity: AlertSeverity,
}

/// Rain beats heat; at most one alert is raised.
pub fn weather_alert(current: &CurrentConditions) -> Option<WeatherAlert> {
    if current.condition_main == "Rain" {
        return Some(WeatherAlert {
            title: "Heavy Rain Warning",
            description: format!(
                "Heavy rainfall expected in {}. Possible flooding in low-lying areas. \
                 Please take necessary precautions.",
                current.location_name
            ),
            severity: AlertSeverity::Medium,
        });
    }

    if current.temperature > 32.0 {
        return Some(WeatherAlert {
            title: "Extreme Heat Warning",
            description: format!(
                "High temperatures expected in {}. Stay hydrated and avoid prolonged exposure \
                 to the sun.",
                current.location_name
            ),
            severity: AlertSeverity::High,
        });
    }

    None
}

pub fn headline(current: Option<&CurrentConditions>, location: &Location) -> String {
    let name = current
        .map(|c| c.location_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(location.display_name);
    format!("Stay updated with the latest weather in {name}, Philippines")
}
