//! Weather fetch client with read-through caching.
//!
//! Consults the TTL cache before every network call and writes results
//! back on success. Failures are logged and surfaced to the caller
//! unchanged; nothing is retried. Concurrent calls for the same key
//! before the cache is warm will each hit the network (no in-flight
//! de-duplication).

use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::cache::TtlCache;
use crate::types::{
    CompleteWeather, CurrentResponse, CurrentWeather, ForecastDay, ForecastResponse, WeatherError,
};

const ICON_BASE_URL: &str = "https://www.weatherbit.io/static/img/icons";
const COUNTRY_CODE: &str = "US";
const FORECAST_DAYS: &str = "5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct WeatherClient {
    client: reqwest::Client,
    cache: Arc<TtlCache>,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a client against `base_url` (no trailing slash), caching
    /// results in `cache`.
    pub fn new(
        base_url: &str,
        api_key: &str,
        cache: Arc<TtlCache>,
    ) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            cache,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Current conditions for a postal code, from cache when fresh.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, zip_code: &str) -> Result<CurrentWeather, WeatherError> {
        let cache_key = format!("current_{}", zip_code);

        if let Some(cached) = self.cache.get::<CurrentWeather>(&cache_key) {
            tracing::debug!("Current conditions served from cache: {}", zip_code);
            return Ok(cached);
        }

        tracing::info!("Fetching current conditions from provider: {}", zip_code);

        let url = format!("{}/current", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("postal_code", zip_code),
                ("country", COUNTRY_CODE),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::error!("Current conditions request failed: {}", e))?;

        let envelope: CurrentResponse = self.handle_response(response).await?;

        let Some(current) = envelope.data.into_iter().next() else {
            tracing::warn!("Provider returned no data for {}", zip_code);
            return Err(WeatherError::NoData(zip_code.to_string()));
        };

        self.cache.set(&cache_key, &current);
        Ok(current)
    }

    /// Five-day forecast for a postal code, from cache when fresh.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, zip_code: &str) -> Result<Vec<ForecastDay>, WeatherError> {
        let cache_key = format!("forecast_{}", zip_code);

        if let Some(cached) = self.cache.get::<Vec<ForecastDay>>(&cache_key) {
            tracing::debug!("Forecast served from cache: {}", zip_code);
            return Ok(cached);
        }

        tracing::info!("Fetching forecast from provider: {}", zip_code);

        let url = format!("{}/forecast/daily", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("postal_code", zip_code),
                ("country", COUNTRY_CODE),
                ("days", FORECAST_DAYS),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::error!("Forecast request failed: {}", e))?;

        let envelope: ForecastResponse = self.handle_response(response).await?;

        if envelope.data.is_empty() {
            tracing::warn!("Provider returned no forecast data for {}", zip_code);
            return Err(WeatherError::NoData(zip_code.to_string()));
        }

        self.cache.set(&cache_key, &envelope.data);
        Ok(envelope.data)
    }

    /// Current conditions and forecast together, for the detail view.
    ///
    /// Returns synchronously from cache when both halves are fresh;
    /// otherwise issues the missing requests concurrently (each half
    /// consults the cache itself, so a half-warm cache costs exactly one
    /// request). The first failure wins.
    #[instrument(skip(self), level = "info")]
    pub async fn complete(&self, zip_code: &str) -> Result<CompleteWeather, WeatherError> {
        let current_cached = self
            .cache
            .get::<CurrentWeather>(&format!("current_{}", zip_code));
        let forecast_cached = self
            .cache
            .get::<Vec<ForecastDay>>(&format!("forecast_{}", zip_code));

        if let (Some(current), Some(forecast)) = (current_cached, forecast_cached) {
            tracing::debug!("Complete weather served from cache: {}", zip_code);
            return Ok(CompleteWeather { current, forecast });
        }

        let (current, forecast) =
            tokio::try_join!(self.current(zip_code), self.forecast(zip_code))?;

        Ok(CompleteWeather { current, forecast })
    }

    /// URL of the provider icon for an icon code. Pure, no I/O.
    pub fn icon_url(&self, icon_code: &str) -> String {
        format!("{}/{}.png", ICON_BASE_URL, icon_code)
    }

    /// Decode a 2xx response body; turn non-2xx statuses into provider
    /// errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(e.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Provider returned {}: {}", status, message);
            Err(WeatherError::Provider {
                status: status.as_u16(),
                message,
            })
        }
    }
}
