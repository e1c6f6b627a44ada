//! Core library for the `weathery` dashboard.
//!
//! This crate defines:
//! - The registry of selectable Philippine cities
//! - API key resolution and the saved key override
//! - The OpenWeatherMap gateway and its typed errors
//! - Forecast normalization (chart series, daily strip)
//! - The dashboard controller that owns the view state
//!
//! It is used by `weathery-cli`, but any other front end can drive the
//! [`DashboardController`] and render its [`ViewState`] snapshots.

pub mod config;
pub mod controller;
pub mod credential;
pub mod display;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod location;
pub mod model;
pub mod normalize;

pub use config::Config;
pub use controller::DashboardController;
pub use credential::{CredentialResolver, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{FailureKind, WeatherError};
pub use gateway::{OpenWeatherGateway, WeatherGateway};
pub use location::{Location, resolve_location};
pub use model::{
    ChartPoint, CurrentConditions, DailyForecastEntry, DashboardStatus, ForecastPoint,
    ForecastSeries, ViewState,
};
