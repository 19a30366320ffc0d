use serde::Deserialize;

/// Success body of `GET /api/explore`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExploreResult {
    pub city: String,
    pub weather: WeatherSnapshot,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tourism: Vec<TourismSite>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
    #[serde(default)]
    pub icon: Option<String>,
    /// Offset from UTC in seconds at the queried location.
    #[serde(default)]
    pub timezone_offset: i64,
}

impl WeatherSnapshot {
    /// OpenWeatherMap-hosted icon image for this snapshot's icon code.
    /// The backend may send a missing or empty code; both mean "no icon".
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(|code| format!("https://openweathermap.org/img/wn/{}@2x.png", code))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TourismSite {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
