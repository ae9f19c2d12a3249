//! Weather provider adapter for a WeatherAPI-compatible
//! `GET /v1/current.json` endpoint.

mod dto;
mod http_provider;

pub use http_provider::{DEFAULT_WEATHER_TIMEOUT, HttpWeatherProvider};
