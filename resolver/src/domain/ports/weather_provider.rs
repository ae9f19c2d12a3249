//! Driven port fetching the current temperature of a locality.

use async_trait::async_trait;
use trace_context::TraceContext;

use super::define_port_error;
use crate::domain::Locality;

define_port_error! {
    /// Errors surfaced while querying the weather provider.
    pub enum WeatherProviderError {
        /// The provider answered with a status other than 200.
        Status { status: u16 } =>
            "weather provider returned status {status}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "weather transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } =>
            "weather timeout: {message}",
        /// The response body lacked a numeric `current.temp_c`.
        Decode { message: String } =>
            "weather response decode failed: {message}",
        /// The adapter could not build the request.
        InvalidRequest { message: String } =>
            "weather request invalid: {message}",
    }
}

/// Port for reading the current temperature in Celsius.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current temperature at `locality`, propagating `trace` upstream.
    async fn current_celsius(
        &self,
        locality: &Locality,
        trace: &TraceContext,
    ) -> Result<f64, WeatherProviderError>;
}

/// Fixture provider reporting a constant 25 °C.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWeatherProvider;

#[async_trait]
impl WeatherProvider for FixtureWeatherProvider {
    async fn current_celsius(
        &self,
        _locality: &Locality,
        _trace: &TraceContext,
    ) -> Result<f64, WeatherProviderError> {
        Ok(25.0)
    }
}
