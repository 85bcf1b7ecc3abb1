//! Weather condition code → human-readable label.

use std::collections::HashMap;

/// Label returned for any code not present in the catalog.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptionEntry {
    pub code: &'static str,
    pub label: &'static str,
}

const fn entry(code: &'static str, label: &'static str) -> DescriptionEntry {
    DescriptionEntry { code, label }
}

/// OpenWeather condition ids.
const OPENWEATHER_DESCRIPTIONS: &[DescriptionEntry] = &[
    entry("200", "Thunderstorm with light rain"),
    entry("201", "Thunderstorm with rain"),
    entry("202", "Thunderstorm with heavy rain"),
    entry("210", "Light thunderstorm"),
    entry("211", "Thunderstorm"),
    entry("212", "Heavy thunderstorm"),
    entry("221", "Ragged thunderstorm"),
    entry("230", "Thunderstorm with light drizzle"),
    entry("231", "Thunderstorm with drizzle"),
    entry("232", "Thunderstorm with heavy drizzle"),
    entry("300", "Light intensity drizzle"),
    entry("301", "Drizzle"),
    entry("302", "Heavy intensity drizzle"),
    entry("310", "Light intensity drizzle rain"),
    entry("311", "Drizzle rain"),
    entry("312", "Heavy intensity drizzle rain"),
    entry("313", "Shower rain and drizzle"),
    entry("314", "Heavy shower rain and drizzle"),
    entry("321", "Shower drizzle"),
    entry("500", "Light rain"),
    entry("501", "Moderate rain"),
    entry("502", "Heavy intensity rain"),
    entry("503", "Very heavy rain"),
    entry("504", "Extreme rain"),
    entry("511", "Freezing rain"),
    entry("520", "Light intensity shower rain"),
    entry("521", "Shower rain"),
    entry("522", "Heavy intensity shower rain"),
    entry("531", "Ragged shower rain"),
    entry("600", "Light snow"),
    entry("601", "Snow"),
    entry("602", "Heavy snow"),
    entry("611", "Sleet"),
    entry("612", "Light shower sleet"),
    entry("613", "Shower sleet"),
    entry("615", "Light rain and snow"),
    entry("616", "Rain and snow"),
    entry("620", "Light shower snow"),
    entry("621", "Shower snow"),
    entry("622", "Heavy shower snow"),
    entry("701", "Mist"),
    entry("711", "Smoke"),
    entry("721", "Haze"),
    entry("731", "Sand/dust whirls"),
    entry("741", "Fog"),
    entry("751", "Sand"),
    entry("761", "Dust"),
    entry("762", "Volcanic ash"),
    entry("771", "Squalls"),
    entry("781", "Tornado"),
    entry("800", "Clear sky"),
    entry("801", "Few clouds"),
    entry("802", "Scattered clouds"),
    entry("803", "Broken clouds"),
    entry("804", "Overcast clouds"),
];

/// Immutable lookup table, built once at start-up and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct DescriptionCatalog {
    labels: HashMap<&'static str, &'static str>,
}

impl DescriptionCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = DescriptionEntry>) -> Self {
        Self { labels: entries.into_iter().map(|e| (e.code, e.label)).collect() }
    }

    pub fn openweather() -> Self {
        Self::from_entries(OPENWEATHER_DESCRIPTIONS.iter().copied())
    }

    /// Never fails: unknown codes map to [`UNKNOWN_LABEL`].
    pub fn lookup_description(&self, code: &str) -> &'static str {
        self.labels.get(code.trim()).copied().unwrap_or(UNKNOWN_LABEL)
    }

    /// Like [`Self::lookup_description`], treating an absent code as unknown.
    pub fn describe(&self, code: Option<&str>) -> &'static str {
        code.map_or(UNKNOWN_LABEL, |c| self.lookup_description(c))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Every code and its label, ordered by code.
    pub fn entries(&self) -> Vec<DescriptionEntry> {
        let mut entries: Vec<_> = self.labels.iter().map(|(&code, &label)| entry(code, label)).collect();
        entries.sort_unstable_by_key(|e| e.code);
        entries
    }
}
