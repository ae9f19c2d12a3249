//! Shared HTTP adapter state.

use std::sync::Arc;

use trace_context::Tracer;

use crate::domain::ports::WeatherResolver;

/// Dependencies handed to the `/cep` handler via `web::Data`.
#[derive(Clone)]
pub struct HttpState {
    /// Tracer for `service-a` spans.
    pub tracer: Tracer,
    /// Client for the resolver service.
    pub resolver: Arc<dyn WeatherResolver>,
}

impl HttpState {
    /// Bundle the tracer and the resolver port.
    #[must_use]
    pub fn new(tracer: Tracer, resolver: Arc<dyn WeatherResolver>) -> Self {
        Self { tracer, resolver }
    }
}
