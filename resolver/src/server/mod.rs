//! Server construction and adapter wiring.

mod config;

pub use config::ResolverConfig;

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use trace_context::{TracePropagation, Tracer};

use resolver::domain::WeatherLookupService;
use resolver::inbound::http::configure;
use resolver::inbound::http::state::HttpState;
use resolver::outbound::directory::{DEFAULT_DIRECTORY_TIMEOUT, HttpLocalityDirectory};
use resolver::outbound::weather_api::{DEFAULT_WEATHER_TIMEOUT, HttpWeatherProvider};

fn build_http_state(config: &ResolverConfig, tracer: Tracer) -> std::io::Result<HttpState> {
    let directory =
        HttpLocalityDirectory::new(config.directory_url.clone(), DEFAULT_DIRECTORY_TIMEOUT)
            .map_err(|e| std::io::Error::other(format!("directory client: {e}")))?;
    let weather = HttpWeatherProvider::new(
        config.weather_url.clone(),
        config.weather_api_key.clone(),
        DEFAULT_WEATHER_TIMEOUT,
    )
    .map_err(|e| std::io::Error::other(format!("weather client: {e}")))?;
    Ok(HttpState::new(
        tracer,
        WeatherLookupService::new(Arc::new(directory), Arc::new(weather)),
    ))
}

/// Construct the resolver HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] when an HTTP client cannot be built or the
/// socket cannot be bound.
pub fn create_server(config: &ResolverConfig, tracer: Tracer) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(config, tracer)?);
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
