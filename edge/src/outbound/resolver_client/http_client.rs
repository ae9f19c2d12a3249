//! Reqwest-backed resolver client.
//!
//! The response body is handed back as a stream so the edge can relay it
//! without buffering or decoding.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::{Client, Url};
use trace_context::{TRACEPARENT_HEADER, TraceContext};

use super::dto::WeatherRequestDto;
use crate::domain::PostalCode;
use crate::domain::ports::{ResolverReply, WeatherResolver, WeatherResolverError};

/// Timeout for the whole resolver exchange.
pub const DEFAULT_RESOLVER_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolver adapter posting to `{base}/weather`.
#[derive(Debug, Clone)]
pub struct HttpWeatherResolver {
    client: Client,
    base_url: Url,
}

impl HttpWeatherResolver {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn weather_url(&self) -> Result<Url, WeatherResolverError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                WeatherResolverError::invalid_request("resolver base URL cannot carry a path")
            })?
            .pop_if_empty()
            .push("weather");
        Ok(url)
    }
}

#[async_trait]
impl WeatherResolver for HttpWeatherResolver {
    async fn resolve(
        &self,
        code: &PostalCode,
        trace: &TraceContext,
    ) -> Result<ResolverReply, WeatherResolverError> {
        let response = self
            .client
            .post(self.weather_url()?)
            .header(TRACEPARENT_HEADER, trace.to_traceparent())
            .json(&WeatherRequestDto {
                cep: code.as_str(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map_err(|error| WeatherResolverError::body(error.to_string()));
        Ok(ResolverReply::new(status, body))
    }
}

fn map_transport_error(error: reqwest::Error) -> WeatherResolverError {
    if error.is_timeout() {
        WeatherResolverError::timeout(error.to_string())
    } else {
        WeatherResolverError::transport(error.to_string())
    }
}
