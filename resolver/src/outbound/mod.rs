//! Outbound HTTP adapters for the postal directory and the weather provider.

pub mod directory;
pub mod weather_api;
