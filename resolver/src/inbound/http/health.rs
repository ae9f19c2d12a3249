//! Liveness endpoint.

use actix_web::HttpResponse;
use serde_json::json;

/// Answer `200 {"status":"ok"}` for any method.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test, web};
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case::get(test::TestRequest::get())]
    #[case::post(test::TestRequest::post())]
    #[case::delete(test::TestRequest::delete())]
    #[actix_web::test]
    async fn responds_ok_for_any_method(#[case] request: test::TestRequest) {
        let app =
            test::init_service(App::new().route("/health", web::route().to(health))).await;
        let res = test::call_service(&app, request.uri("/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"status": "ok"}));
    }
}
