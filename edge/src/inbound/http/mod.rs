//! HTTP inbound adapter exposing `/cep` and `/health`.

pub mod cep;
pub mod error;
pub mod health;
pub mod request_body;
pub mod state;

use actix_web::web;

pub use error::ApiResult;

/// Register the edge routes. Both paths accept every method; `/cep`
/// answers non-`POST` requests itself.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use edge::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/cep").route(web::route().to(cep::handle_cep)))
        .service(web::resource("/health").route(web::route().to(health::health)));
}
