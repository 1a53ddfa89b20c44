use std::sync::Arc;

use zipcast_core::{AppError, Config};
use zipcast_weather::{validate_zip_code, FileStorage, LocationRegistry, TtlCache, WeatherClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize core (tracing)
    zipcast_core::init()?;

    if let Err(e) = run().await {
        tracing::error!("Startup failed: {}", e);
        eprintln!("{}", e.user_message());
        return Err(e.into());
    }

    Ok(())
}

/// Composition root: every component is constructed here and handed to
/// its consumers explicitly; there is no global state.
async fn run() -> Result<(), AppError> {
    let (config, _validation) = Config::load_validated()?;

    let storage = Arc::new(
        FileStorage::new(config.config_dir.join("storage")).map_err(AppError::Other)?,
    );
    let cache = Arc::new(TtlCache::new(storage.clone()));
    let registry = LocationRegistry::new(storage);
    let client = WeatherClient::new(&config.provider.api_url, &config.provider.api_key, cache.clone())
        .map_err(|e| AppError::Weather(e.to_string()))?;

    println!("Zipcast - Postal-code weather dashboard");
    println!("  Config directory: {}", config.config_dir.display());
    println!("  Cache TTL: {:.1} hours", cache.ttl_hours());

    let locations = registry.all();
    if locations.is_empty() {
        println!("\nNo saved locations yet.");
        return Ok(());
    }

    if !config.provider.is_configured() {
        println!("\nWeather API key not configured (set WEATHERBIT_API_KEY).");
        return Ok(());
    }

    println!("\nSaved locations:");
    for location in locations {
        // Persisted entries were validated on the way in, but the medium
        // is plain text; skip anything hand-edited into an invalid state
        let zip_code = match validate_zip_code(&location.zip_code) {
            Ok(zip_code) => zip_code,
            Err(e) => {
                tracing::warn!("Skipping invalid saved postal code {:?}: {}", location.zip_code, e);
                continue;
            }
        };

        match client.current(&zip_code).await {
            Ok(weather) => {
                println!(
                    "  {} ({}): {:.1}°, {}",
                    weather.city_name, zip_code, weather.temp, weather.weather.description
                );
            }
            Err(e) => {
                tracing::error!("Failed to fetch weather for {}: {}", zip_code, e);
                println!("  {}: {}", zip_code, e.user_message());
            }
        }
    }

    Ok(())
}
