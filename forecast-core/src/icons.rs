/// Icon codes OpenWeather attaches to conditions (day and night variants).
const KNOWN_ICONS: &[&str] = &[
    "01d", "01n", "02d", "02n", "03d", "03n", "04d", "04n", "09d", "09n", "10d", "10n", "11d",
    "11n", "13d", "13n", "50d", "50n",
];

pub const DEFAULT_ICON_DIR: &str = "icons";
pub const PLACEHOLDER_ICON: &str = "unknown";

/// Maps provider icon codes to display asset paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResolver {
    asset_dir: String,
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_DIR)
    }
}

impl IconResolver {
    pub fn new(asset_dir: impl Into<String>) -> Self {
        let asset_dir: String = asset_dir.into();
        Self { asset_dir: asset_dir.trim_end_matches('/').to_string() }
    }

    /// Total over all inputs; unknown codes resolve to the placeholder asset.
    pub fn resolve_icon(&self, code: &str) -> String {
        let code = code.trim();
        let key = if KNOWN_ICONS.contains(&code) { code } else { PLACEHOLDER_ICON };
        format!("{}/{key}.png", self.asset_dir)
    }

    pub fn resolve(&self, code: Option<&str>) -> String {
        self.resolve_icon(code.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_icon() {
        let icons = IconResolver::default();
        assert_eq!(icons.resolve_icon("10d"), "icons/10d.png");
        assert_eq!(icons.resolve(Some("01n")), "icons/01n.png");
    }

    #[test]
    fn unknown_icon_is_placeholder() {
        let icons = IconResolver::new("assets/weather/");
        assert_eq!(icons.resolve_icon("99x"), "assets/weather/unknown.png");
        assert_eq!(icons.resolve_icon("../etc/passwd"), "assets/weather/unknown.png");
        assert_eq!(icons.resolve(None), "assets/weather/unknown.png");
    }
}
