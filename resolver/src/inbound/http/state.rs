//! Shared HTTP adapter state.

use trace_context::Tracer;

use crate::domain::WeatherLookupService;

/// Dependencies handed to the `/weather` handler via `web::Data`.
#[derive(Clone)]
pub struct HttpState {
    /// Tracer for `service-b` spans.
    pub tracer: Tracer,
    /// Directory and weather lookup use-case.
    pub weather: WeatherLookupService,
}

impl HttpState {
    /// Bundle the tracer and the use-case.
    #[must_use]
    pub fn new(tracer: Tracer, weather: WeatherLookupService) -> Self {
        Self { tracer, weather }
    }
}
