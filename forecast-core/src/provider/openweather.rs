use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::model::{
    AirConditions, ForecastPayload, Location, RawCurrentWeather, RawWeatherSample,
};

use super::{FetchError, WeatherSource};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_HISTORY_URL: &str = "https://history.openweathermap.org";

const DAY_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
    history_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_urls(api_key, DEFAULT_BASE_URL, DEFAULT_HISTORY_URL)
    }

    /// Points the client at other hosts, e.g. a mock server.
    pub fn with_base_urls(
        api_key: String,
        base_url: impl Into<String>,
        history_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            history_url: history_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn query(&self, location: &Location) -> Vec<(&'static str, String)> {
        vec![
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
        what: &'static str,
    ) -> Result<T, FetchError> {
        debug!(url, what, "requesting OpenWeather");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Transport { what, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Transport { what, source })?;

        if !status.is_success() {
            return Err(FetchError::Status { what, status: status.as_u16(), body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { what, source })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherProvider {
    #[instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastPayload, FetchError> {
        if !location.is_valid() {
            return Err(FetchError::InvalidCoordinates);
        }

        let query = self.query(location);
        let current_url = format!("{}/data/2.5/weather", self.base_url);
        let forecast_url = format!("{}/data/2.5/forecast", self.base_url);

        let (current, forecast) = tokio::try_join!(
            self.get_json::<OwCurrentResponse>(&current_url, &query, "current weather"),
            self.get_json::<OwForecastResponse>(&forecast_url, &query, "forecast"),
        )?;

        let city = forecast.city.unwrap_or_default();
        let utc_offset_secs = city.timezone.or(current.timezone);
        let name = current.name.filter(|n| !n.is_empty()).or(city.name);
        let country = current.sys.and_then(|s| s.country).or(city.country);

        let city_label = match (name, country) {
            (Some(name), Some(country)) => format!("{name}, {country}"),
            (Some(name), None) => name,
            _ => "Unknown location".to_string(),
        };

        let (condition_code, icon_code) = first_condition(current.weather);

        debug!(samples = forecast.list.len(), "forecast fetched");

        let main = current.main.unwrap_or_default();
        let air = AirConditions {
            feels_like: main.feels_like,
            wind_speed_mps: current.wind.and_then(|w| w.speed),
            humidity_pct: main.humidity,
            clouds_pct: current.clouds.and_then(|c| c.all),
        };

        Ok(ForecastPayload {
            current: RawCurrentWeather {
                temperature: main.temp,
                condition_code,
                icon_code,
                city_label,
                air,
            },
            series: forecast.list.into_iter().map(OwEntry::into_sample).collect(),
            utc_offset_secs,
        })
    }

    #[instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    async fn fetch_hourly(
        &self,
        location: &Location,
        start_epoch: i64,
    ) -> Result<Vec<RawWeatherSample>, FetchError> {
        if !location.is_valid() {
            return Err(FetchError::InvalidCoordinates);
        }

        let mut query = self.query(location);
        query.extend([
            ("type", "hour".to_string()),
            ("start", start_epoch.to_string()),
            ("end", (start_epoch + DAY_SECS).to_string()),
        ]);
        let url = format!("{}/data/2.5/history/city", self.history_url);

        let history: OwHistoryResponse = self.get_json(&url, &query, "hourly history").await?;

        debug!(samples = history.list.len(), "hourly history fetched");

        Ok(history.list.into_iter().map(OwEntry::into_sample).collect())
    }
}

/// Accepts any JSON for the field; a value of the wrong shape becomes `None`
/// instead of failing the whole payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    #[serde(default, deserialize_with = "lenient")]
    temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default, deserialize_with = "lenient")]
    speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    #[serde(default, deserialize_with = "lenient")]
    all: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWeather {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default, deserialize_with = "lenient")]
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwCurrentResponse {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    sys: Option<OwSys>,
    #[serde(default, deserialize_with = "lenient")]
    main: Option<OwMain>,
    #[serde(default, deserialize_with = "lenient")]
    wind: Option<OwWind>,
    #[serde(default, deserialize_with = "lenient")]
    clouds: Option<OwClouds>,
    #[serde(default, deserialize_with = "lenient")]
    weather: Option<Vec<OwWeather>>,
    #[serde(default, deserialize_with = "lenient")]
    timezone: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct OwCity {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    timezone: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct OwEntry {
    #[serde(default, deserialize_with = "lenient")]
    dt: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    main: Option<OwMain>,
    #[serde(default, deserialize_with = "lenient")]
    weather: Option<Vec<OwWeather>>,
}

impl OwEntry {
    fn into_sample(self) -> RawWeatherSample {
        let (condition_code, icon_code) = first_condition(self.weather);
        RawWeatherSample {
            timestamp: self.dt,
            temperature: self.main.and_then(|m| m.temp),
            condition_code,
            icon_code,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwForecastResponse {
    #[serde(default, deserialize_with = "lenient")]
    city: Option<OwCity>,
    #[serde(default)]
    list: Vec<OwEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct OwHistoryResponse {
    #[serde(default)]
    list: Vec<OwEntry>,
}

fn first_condition(weather: Option<Vec<OwWeather>>) -> (Option<String>, Option<String>) {
    match weather.and_then(|w| w.into_iter().next()) {
        Some(w) => (w.id.map(|id| id.to_string()), w.icon),
        None => (None, None),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
