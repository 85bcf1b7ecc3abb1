use anyhow::{Context, Result, anyhow, bail};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{icons::DEFAULT_ICON_DIR, model::Location};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "FORECAST_API_KEY";

/// Boston, used until the user configures coordinates.
pub const DEFAULT_LOCATION: Location = Location { latitude: 42.361145, longitude: -71.057083 };

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// city = "Boston, US"
/// latitude = 42.361145
/// longitude = -71.057083
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Display label; when absent the provider's city name is shown.
    pub city: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Fixed UTC offset in seconds for day boundaries. Defaults to the
    /// offset reported by the provider.
    pub utc_offset_secs: Option<i32>,

    pub icon_dir: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Result<String> {
        Self::resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    fn resolve_api_key(from_env: Option<String>, stored: Option<&str>) -> Result<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| stored.filter(|k| !k.trim().is_empty()).map(str::to_owned))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `forecast configure` or set {API_KEY_ENV}."
                )
            })
    }

    /// Configured coordinates, or [`DEFAULT_LOCATION`] when none are set.
    pub fn location(&self) -> Result<Location> {
        let location = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Location::new(lat, lon),
            (None, None) => DEFAULT_LOCATION,
            _ => bail!("Both latitude and longitude must be configured"),
        };

        if !location.is_valid() {
            bail!(
                "Configured coordinates ({}, {}) are out of range",
                location.latitude,
                location.longitude
            );
        }

        Ok(location)
    }

    pub fn set_location(&mut self, location: Location) -> Result<()> {
        if !location.is_valid() {
            bail!("Latitude must be -90..90 and longitude -180..180");
        }
        self.latitude = Some(location.latitude);
        self.longitude = Some(location.longitude);
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<Option<FixedOffset>> {
        self.utc_offset_secs
            .map(|secs| {
                FixedOffset::east_opt(secs)
                    .ok_or_else(|| anyhow!("utc_offset_secs {secs} is out of range"))
            })
            .transpose()
    }

    pub fn icon_dir(&self) -> &str {
        self.icon_dir.as_deref().unwrap_or(DEFAULT_ICON_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let err = Config::resolve_api_key(None, None).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("forecast configure"));
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let key = Config::resolve_api_key(Some("ENV".into()), Some("FILE")).unwrap();
        assert_eq!(key, "ENV");

        let key = Config::resolve_api_key(Some("  ".into()), Some("FILE")).unwrap();
        assert_eq!(key, "FILE");
    }

    #[test]
    fn location_defaults_to_boston() {
        assert_eq!(Config::default().location().unwrap(), DEFAULT_LOCATION);
    }

    #[test]
    fn half_configured_location_is_an_error() {
        let cfg = Config { latitude: Some(10.0), ..Default::default() };
        assert!(cfg.location().is_err());
    }

    #[test]
    fn set_location_rejects_out_of_range() {
        let mut cfg = Config::default();
        assert!(cfg.set_location(Location::new(91.0, 0.0)).is_err());
        assert_eq!(cfg.latitude, None);

        cfg.set_location(Location::new(51.5, -0.12)).unwrap();
        assert_eq!(cfg.location().unwrap(), Location::new(51.5, -0.12));
    }

    #[test]
    fn parses_toml() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "KEY"
            city = "Lisbon, PT"
            latitude = 38.72
            longitude = -9.14
            utc_offset_secs = 3600
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.utc_offset().unwrap(), FixedOffset::east_opt(3600));
        assert_eq!(cfg.icon_dir(), DEFAULT_ICON_DIR);
    }

    #[test]
    fn out_of_range_offset_is_an_error() {
        let cfg = Config { utc_offset_secs: Some(100_000), ..Default::default() };
        assert!(cfg.utc_offset().is_err());
    }

    #[test]
    fn missing_file_loads_default() {
        let path = std::env::temp_dir().join("forecast-core-missing").join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
