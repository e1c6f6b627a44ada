use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    location::Location,
    model::{CurrentConditions, ForecastSeries},
};

pub mod openweather;

pub use openweather::OpenWeatherGateway;

/// Read access to a weather API for a fixed location.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    async fn fetch_current(&self, location: &Location) -> Result<CurrentConditions, WeatherError>;

    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastSeries, WeatherError>;
}
