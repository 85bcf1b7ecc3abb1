use serde::{Deserialize, Serialize};

/// Geographic coordinates of the dashboard's city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One provider time-series entry. Every field may be missing in a loosely
/// shaped payload; the aggregator decides what a gap means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWeatherSample {
    pub timestamp: Option<i64>,
    pub temperature: Option<f64>,
    pub condition_code: Option<String>,
    pub icon_code: Option<String>,
}

/// Air conditions shown beside the current temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirConditions {
    pub feels_like: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub clouds_pct: Option<f64>,
}

/// Current-conditions snapshot as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCurrentWeather {
    pub temperature: Option<f64>,
    pub condition_code: Option<String>,
    pub icon_code: Option<String>,
    pub city_label: String,
    pub air: AirConditions,
}

/// Current weather plus the multi-day series, as fetched in one round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastPayload {
    pub current: RawCurrentWeather,
    pub series: Vec<RawWeatherSample>,
    /// City's offset from UTC in seconds, when the provider reports it.
    pub utc_offset_secs: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayForecast {
    pub date_label: String,
    pub temperature: Option<f64>,
    pub label: String,
    pub icon_ref: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourForecast {
    pub time_label: String,
    pub temperature: Option<f64>,
    pub label: String,
    pub icon_ref: String,
}

/// Current snapshot decorated with catalog label and icon asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub label: String,
    pub icon_ref: String,
    pub air: AirConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayViewModel {
    pub city: String,
    /// Day-of-month and month, e.g. "21 October".
    pub date_label: String,
    pub current: RawCurrentWeather,
    pub conditions: CurrentConditions,
    /// Next days after today, at most four.
    pub upcoming: Vec<DayForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekViewModel {
    pub city: String,
    pub days: Vec<DayForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourViewModel {
    pub city: String,
    pub weekday: String,
    pub hours: Vec<HourForecast>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_bounds() {
        assert!(Location::new(42.36, -71.05).is_valid());
        assert!(Location::new(90.0, 180.0).is_valid());
        assert!(!Location::new(90.5, 0.0).is_valid());
        assert!(!Location::new(0.0, -180.1).is_valid());
        assert!(!Location::new(f64::NAN, 0.0).is_valid());
    }
}
