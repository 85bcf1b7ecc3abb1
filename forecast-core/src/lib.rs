//! Core library for the `forecast` weather dashboard.
//!
//! This crate defines:
//! - Date/time helpers and the condition/icon catalogs
//! - The aggregation pipeline turning raw provider series into view models
//! - The OpenWeather fetch client
//! - The dashboard host state machine
//! - Configuration & credentials handling
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod forecast;
pub mod icons;
pub mod model;
pub mod provider;

pub use catalog::DescriptionCatalog;
pub use clock::Clock;
pub use config::Config;
pub use dashboard::{Dashboard, LoadState, Panel, Route, Snapshot};
pub use forecast::Aggregator;
pub use icons::IconResolver;
pub use model::{
    AirConditions, DayForecast, ForecastPayload, HourForecast, HourViewModel, Location, RawCurrentWeather,
    RawWeatherSample, TodayViewModel, WeekViewModel,
};
pub use provider::{FetchError, OpenWeatherProvider, WeatherSource};
