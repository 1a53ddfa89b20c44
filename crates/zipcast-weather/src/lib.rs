//! Weather dashboard core for Zipcast
//!
//! Tracks current conditions and a 5-day forecast for multiple US
//! postal-code locations, with a persistent TTL cache in front of the
//! provider API and a change-notifying registry of saved locations.

pub mod cache;
pub mod client;
pub mod locations;
pub mod storage;
pub mod types;
pub mod validation;

pub use cache::TtlCache;
pub use client::WeatherClient;
pub use locations::LocationRegistry;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use types::*;
pub use validation::{validate_zip_code, ZipCodeError};
