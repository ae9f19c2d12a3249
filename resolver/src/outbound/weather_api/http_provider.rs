//! Reqwest-backed weather provider adapter.
//!
//! The API key travels in the query string, so transport errors are logged
//! without their URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use trace_context::{TRACEPARENT_HEADER, TraceContext};

use super::dto::CurrentWeatherDto;
use crate::domain::Locality;
use crate::domain::ports::{WeatherProvider, WeatherProviderError};

/// Per-request timeout for weather lookups.
pub const DEFAULT_WEATHER_TIMEOUT: Duration = Duration::from_secs(5);

/// Weather adapter issuing
/// `GET {base}/v1/current.json?key=..&q={locality}&aqi=no`.
#[derive(Clone)]
pub struct HttpWeatherProvider {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl HttpWeatherProvider {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn current_url(&self, locality: &Locality) -> Result<Url, WeatherProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                WeatherProviderError::invalid_request("weather base URL cannot carry a path")
            })?
            .pop_if_empty()
            .extend(["v1", "current.json"]);
        url.query_pairs_mut()
            .clear()
            .append_pair("key", &self.api_key)
            .append_pair("q", locality.as_str())
            .append_pair("aqi", "no");
        Ok(url)
    }
}

impl std::fmt::Debug for HttpWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpWeatherProvider")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WeatherProvider for HttpWeatherProvider {
    async fn current_celsius(
        &self,
        locality: &Locality,
        trace: &TraceContext,
    ) -> Result<f64, WeatherProviderError> {
        let url = self.current_url(locality)?;
        let response = self
            .client
            .get(url)
            .header(TRACEPARENT_HEADER, trace.to_traceparent())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(WeatherProviderError::status(status.as_u16()));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        parse_celsius(body.as_ref())
    }
}

fn parse_celsius(body: &[u8]) -> Result<f64, WeatherProviderError> {
    let decoded: CurrentWeatherDto = serde_json::from_slice(body).map_err(|error| {
        WeatherProviderError::decode(format!("invalid weather JSON payload: {error}"))
    })?;
    Ok(decoded.current.temp_c)
}

fn map_transport_error(source: reqwest::Error) -> WeatherProviderError {
    let error = source.without_url();
    if error.is_timeout() {
        WeatherProviderError::timeout(error.to_string())
    } else {
        WeatherProviderError::transport(error.to_string())
    }
}
