use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::model::{ForecastPayload, Location, RawWeatherSample};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Failures of the fetch boundary. Nothing past the fetch raises errors:
/// data gaps inside a successful payload degrade to fallback values.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reach OpenWeather ({what})")]
    Transport {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {what} request failed with status {status}: {body}")]
    Status { what: &'static str, status: u16, body: String },

    #[error("failed to parse OpenWeather {what} JSON")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,
}

/// Source of raw weather payloads for one city.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions together with the multi-day forecast series.
    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastPayload, FetchError>;

    /// Hourly series for the day starting at `start_epoch`.
    async fn fetch_hourly(
        &self,
        location: &Location,
        start_epoch: i64,
    ) -> Result<Vec<RawWeatherSample>, FetchError>;
}

#[async_trait]
impl<S: WeatherSource + ?Sized> WeatherSource for Box<S> {
    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastPayload, FetchError> {
        (**self).fetch_forecast(location).await
    }

    async fn fetch_hourly(
        &self,
        location: &Location,
        start_epoch: i64,
    ) -> Result<Vec<RawWeatherSample>, FetchError> {
        (**self).fetch_hourly(location, start_epoch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_names_request() {
        let err = FetchError::Status { what: "forecast", status: 401, body: "nope".into() };
        assert_eq!(err.to_string(), "OpenWeather forecast request failed with status 401: nope");
    }

    #[test]
    fn decode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::Decode { what: "current weather", source };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("current weather"));
    }
}
