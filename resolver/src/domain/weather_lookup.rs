//! Use-case chaining the directory and weather lookups.

use std::sync::Arc;

use trace_context::{Span, SpanKind};
use tracing::{info, warn};

use super::ports::{LocalityDirectory, LocalityDirectoryError, WeatherProvider};
use super::{DomainError, PostalCode, TemperatureReading};

/// Span covering the directory lookup.
pub const LOOKUP_CEP_SPAN: &str = "lookup_cep";
/// Span covering the weather lookup.
pub const GET_TEMPERATURE_SPAN: &str = "get_temperature";

/// Resolves a validated postal code to a [`TemperatureReading`].
#[derive(Clone)]
pub struct WeatherLookupService {
    directory: Arc<dyn LocalityDirectory>,
    weather: Arc<dyn WeatherProvider>,
}

impl WeatherLookupService {
    /// Build the service over its two outbound ports.
    #[must_use]
    pub fn new(directory: Arc<dyn LocalityDirectory>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { directory, weather }
    }

    /// Look up the locality of `code`, then its current temperature.
    ///
    /// Each lookup runs in its own child span of `parent`. Directory failures
    /// of any kind become [`DomainError::not_found`]; weather failures become
    /// [`DomainError::temperature_unavailable`].
    ///
    /// # Errors
    ///
    /// Returns the mapped domain error of the first lookup that fails.
    pub async fn resolve(
        &self,
        code: &PostalCode,
        parent: &Span,
    ) -> Result<TemperatureReading, DomainError> {
        let trace_id = parent.trace_id();

        let locality = {
            let mut span = parent.child(LOOKUP_CEP_SPAN, SpanKind::Client);
            span.set_attribute("postal_code", code.as_str());
            match self.directory.lookup_locality(code, span.context()).await {
                Ok(locality) => {
                    span.set_attribute("locality", locality.as_str());
                    span.set_ok();
                    locality
                }
                Err(error) => {
                    match &error {
                        LocalityDirectoryError::NotFound { .. } => {
                            info!(%trace_id, postal_code = code.as_str(), "postal code not found");
                        }
                        _ => warn!(%trace_id, %error, "directory lookup failed"),
                    }
                    span.record_error(error.to_string());
                    return Err(DomainError::not_found());
                }
            }
        };

        let celsius = {
            let mut span = parent.child(GET_TEMPERATURE_SPAN, SpanKind::Client);
            span.set_attribute("locality", locality.as_str());
            match self.weather.current_celsius(&locality, span.context()).await {
                Ok(celsius) => {
                    span.set_attribute("temperature.celsius", celsius);
                    span.set_ok();
                    celsius
                }
                Err(error) => {
                    warn!(%trace_id, %error, "weather lookup failed");
                    span.record_error(error.to_string());
                    return Err(DomainError::temperature_unavailable());
                }
            }
        };

        Ok(TemperatureReading::from_celsius(locality, celsius))
    }
}

#[cfg(test)]
mod tests {
    //! Use-case coverage with mocked ports and a recording tracer.
    use super::*;
    use crate::domain::ports::{
        MockLocalityDirectory, MockWeatherProvider, WeatherProviderError,
    };
    use crate::domain::{ErrorCode, Locality};
    use rstest::{fixture, rstest};
    use trace_context::{RecordingSpanSink, RequestTrace, SpanStatus, Tracer};

    struct Harness {
        tracer: Tracer,
        sink: Arc<RecordingSpanSink>,
    }

    #[fixture]
    fn harness() -> Harness {
        let sink = Arc::new(RecordingSpanSink::default());
        Harness {
            tracer: Tracer::new(sink.clone()),
            sink,
        }
    }

    fn code() -> PostalCode {
        PostalCode::parse("01310100").expect("valid code")
    }

    fn directory_returning(
        result: Result<&'static str, LocalityDirectoryError>,
    ) -> MockLocalityDirectory {
        let mut directory = MockLocalityDirectory::new();
        directory
            .expect_lookup_locality()
            .times(1)
            .returning(move |_, _| {
                result
                    .clone()
                    .map(|name| Locality::new(name).expect("valid locality"))
            });
        directory
    }

    #[rstest]
    #[tokio::test]
    #[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
    async fn resolves_reading_and_records_child_spans(harness: Harness) {
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_current_celsius()
            .withf(|locality, _| locality.as_str() == "São Paulo")
            .times(1)
            .returning(|_, _| Ok(25.0));
        let service = WeatherLookupService::new(
            Arc::new(directory_returning(Ok("São Paulo"))),
            Arc::new(weather),
        );

        let parent = harness
            .tracer
            .start_server_span("handle_weather", &RequestTrace::root());
        let reading = service.resolve(&code(), &parent).await.expect("reading");
        let parent_id = parent.context().span_id();
        parent.end();

        assert_eq!(reading.locality().as_str(), "São Paulo");
        assert!((reading.fahrenheit() - 77.0).abs() < 1e-9);
        assert!((reading.kelvin() - 298.0).abs() < 1e-9);
        assert_eq!(
            harness.sink.names(),
            vec![LOOKUP_CEP_SPAN, GET_TEMPERATURE_SPAN, "handle_weather"]
        );
        let lookup = harness.sink.single(LOOKUP_CEP_SPAN);
        assert_eq!(lookup.parent_span_id, Some(parent_id));
        assert_eq!(lookup.kind, SpanKind::Client);
        assert_eq!(lookup.status, SpanStatus::Ok);
    }

    #[rstest]
    #[case::not_found(LocalityDirectoryError::not_found("99999999"))]
    #[case::transport(LocalityDirectoryError::transport("connection reset"))]
    #[case::timeout(LocalityDirectoryError::timeout("deadline elapsed"))]
    #[case::decode(LocalityDirectoryError::decode("expected value"))]
    #[tokio::test]
    async fn any_directory_failure_maps_to_not_found(
        harness: Harness,
        #[case] failure: LocalityDirectoryError,
    ) {
        let mut weather = MockWeatherProvider::new();
        weather.expect_current_celsius().times(0);
        let service = WeatherLookupService::new(
            Arc::new(directory_returning(Err(failure))),
            Arc::new(weather),
        );

        let parent = harness
            .tracer
            .start_server_span("handle_weather", &RequestTrace::root());
        let error = service
            .resolve(&code(), &parent)
            .await
            .expect_err("lookup should fail");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "can not find zipcode");
        let lookup = harness.sink.single(LOOKUP_CEP_SPAN);
        assert!(matches!(lookup.status, SpanStatus::Error(_)));
    }

    #[rstest]
    #[case::status(WeatherProviderError::status(503_u16))]
    #[case::transport(WeatherProviderError::transport("dns error"))]
    #[case::decode(WeatherProviderError::decode("missing field `temp_c`"))]
    #[tokio::test]
    async fn any_weather_failure_maps_to_temperature_unavailable(
        harness: Harness,
        #[case] failure: WeatherProviderError,
    ) {
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_current_celsius()
            .times(1)
            .returning(move |_, _| Err(failure.clone()));
        let service = WeatherLookupService::new(
            Arc::new(directory_returning(Ok("Recife"))),
            Arc::new(weather),
        );

        let parent = harness
            .tracer
            .start_server_span("handle_weather", &RequestTrace::root());
        let error = service
            .resolve(&code(), &parent)
            .await
            .expect_err("lookup should fail");

        assert_eq!(error.code(), ErrorCode::InternalError);
        assert_eq!(error.message(), "failed to get temperature");
        let span = harness.sink.single(GET_TEMPERATURE_SPAN);
        assert!(matches!(span.status, SpanStatus::Error(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn downstream_calls_receive_child_context(harness: Harness) {
        let parent = harness
            .tracer
            .start_server_span("handle_weather", &RequestTrace::root());
        let trace_id = parent.trace_id();
        let parent_span = parent.context().span_id();

        let mut directory = MockLocalityDirectory::new();
        directory
            .expect_lookup_locality()
            .withf(move |_, trace| {
                trace.trace_id() == trace_id && trace.span_id() != parent_span
            })
            .times(1)
            .returning(|_, _| Ok(Locality::new("Natal").expect("valid locality")));
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_current_celsius()
            .withf(move |_, trace| trace.trace_id() == trace_id)
            .times(1)
            .returning(|_, _| Ok(30.0));
        let service = WeatherLookupService::new(Arc::new(directory), Arc::new(weather));

        service.resolve(&code(), &parent).await.expect("reading");
    }
}
