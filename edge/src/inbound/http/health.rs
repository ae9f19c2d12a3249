//! Liveness endpoint.

use actix_web::HttpResponse;
use serde_json::json;

/// Answer `200 {"status":"ok"}` for any method.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
