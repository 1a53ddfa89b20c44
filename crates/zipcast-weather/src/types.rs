use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condition description and icon code as the provider reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionInfo {
    pub description: String,
    pub icon: String,
}

/// Current conditions for one location.
///
/// Field names follow the provider's wire format so responses can be
/// cached and replayed without a mapping layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Temperature
    pub temp: f64,
    pub weather: ConditionInfo,
    /// Relative humidity (%)
    pub rh: f64,
    pub sunrise: String,
    pub sunset: String,
    pub city_name: String,
    pub state_code: String,
    pub country_code: String,
    /// Wind speed
    pub wind_spd: f64,
    /// Cloud cover (%)
    pub clouds: f64,
}

/// One day of the forecast window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub valid_date: String,
    pub temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub weather: ConditionInfo,
    /// Probability of precipitation (%)
    pub pop: f64,
    /// Relative humidity (%)
    pub rh: f64,
}

/// Envelope for the current-conditions endpoint: `{data: [...], count}`.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    #[serde(default)]
    pub data: Vec<CurrentWeather>,
}

/// Envelope for the forecast endpoint: `{data: [...], city_name, ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    pub data: Vec<ForecastDay>,
}

/// Current conditions and forecast bundled for the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteWeather {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}

/// A user-tracked location (US postal code).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub zip_code: String,
    /// Human-readable label (usually the city name); optional at creation.
    pub name: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Weather fetch errors.
///
/// Persistence and cache-decode failures never appear here; the cache
/// recovers from those locally and acts as if empty.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("No weather data for location: {0}")]
    NoData(String),

    #[error("Provider error: {status} - {message}")]
    Provider { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoData(_) => "No weather data found for this location.",
            Self::Provider { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            Self::Provider { .. } => "Could not load weather. Please try again.",
            Self::Network(_) => "Network error. Check your connection.",
            Self::Parse(_) => "Received an unexpected response. Please try again.",
        }
    }
}
