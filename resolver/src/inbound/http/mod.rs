//! HTTP inbound adapter exposing `/weather` and `/health`.

pub mod error;
pub mod health;
pub mod request_body;
pub mod state;
pub mod weather;

use actix_web::web;

pub use error::ApiResult;

/// Register the resolver routes. Both paths accept every method so the
/// handlers can answer non-`POST` requests themselves.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use resolver::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/weather").route(web::route().to(weather::resolve_weather)))
        .service(web::resource("/health").route(web::route().to(health::health)));
}
