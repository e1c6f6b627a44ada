use serde::Serialize;

use crate::error::WeatherError;

/// A selectable city with fixed coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub id: &'static str,
    pub display_name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub const DEFAULT_LOCATION_ID: &str = "manila";

pub const LOCATIONS: &[Location] = &[
    Location { id: "manila", display_name: "Manila", lat: 14.5995, lon: 120.9842 },
    Location { id: "quezon-city", display_name: "Quezon City", lat: 14.676, lon: 121.0437 },
    Location { id: "cebu", display_name: "Cebu City", lat: 10.3157, lon: 123.8854 },
    Location { id: "davao", display_name: "Davao City", lat: 7.1907, lon: 125.4553 },
    Location { id: "baguio", display_name: "Baguio City", lat: 16.4023, lon: 120.596 },
    Location { id: "tagaytay", display_name: "Tagaytay", lat: 14.1153, lon: 120.9622 },
    Location { id: "boracay", display_name: "Boracay", lat: 11.9674, lon: 121.9248 },
    Location { id: "palawan", display_name: "Palawan", lat: 9.8349, lon: 118.7384 },
    Location { id: "iloilo", display_name: "Iloilo City", lat: 10.7202, lon: 122.5621 },
    Location { id: "batangas", display_name: "Batangas", lat: 13.7565, lon: 121.0583 },
];

impl Location {
    /// Strict lookup, used to validate user input. Ids are matched exactly.
    pub fn find(id: &str) -> Result<&'static Location, WeatherError> {
        LOCATIONS
            .iter()
            .find(|loc| loc.id == id)
            .ok_or_else(|| WeatherError::UnknownLocation(id.to_string()))
    }

    pub fn all() -> &'static [Location] {
        LOCATIONS
    }
}

/// Look up a location by id, falling back to Manila for unknown ids.
pub fn resolve_location(id: &str) -> &'static Location {
    Location::find(id).unwrap_or(&LOCATIONS[0])
}
