//! HTTP client for the resolver's `POST /weather` endpoint.

mod dto;
mod http_client;

pub use http_client::{DEFAULT_RESOLVER_TIMEOUT, HttpWeatherResolver};
