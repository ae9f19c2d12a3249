//! Server construction and adapter wiring.

mod config;

pub use config::EdgeConfig;

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use trace_context::{TracePropagation, Tracer};

use edge::inbound::http::configure;
use edge::inbound::http::state::HttpState;
use edge::outbound::resolver_client::{DEFAULT_RESOLVER_TIMEOUT, HttpWeatherResolver};

/// Construct the edge HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] when the resolver client cannot be built or
/// the socket cannot be bound.
pub fn create_server(config: &EdgeConfig, tracer: Tracer) -> std::io::Result<Server> {
    let resolver = HttpWeatherResolver::new(config.resolver_url.clone(), DEFAULT_RESOLVER_TIMEOUT)
        .map_err(|e| std::io::Error::other(format!("resolver client: {e}")))?;
    let http_state = web::Data::new(HttpState::new(tracer, Arc::new(resolver)));
    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_state.clone())
            .wrap(TracePropagation)
            .configure(configure)
    })
    .bind(config.bind_addr)?
    .run();
    Ok(server)
}
