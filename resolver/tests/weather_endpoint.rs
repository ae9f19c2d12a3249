//! End-to-end coverage of `/weather` with real adapters against stub
//! directory and weather APIs.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use reqwest::Url;
use resolver::domain::WeatherLookupService;
use resolver::inbound::http::configure;
use resolver::inbound::http::state::HttpState;
use resolver::outbound::directory::{DEFAULT_DIRECTORY_TIMEOUT, HttpLocalityDirectory};
use resolver::outbound::weather_api::{DEFAULT_WEATHER_TIMEOUT, HttpWeatherProvider};
use rstest::rstest;
use serde_json::{Value, json};
use trace_context::{RecordingSpanSink, TracePropagation, Tracer};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Upstreams {
    directory: MockServer,
    weather: MockServer,
}

impl Upstreams {
    async fn start() -> Self {
        Self {
            directory: MockServer::start().await,
            weather: MockServer::start().await,
        }
    }

    fn state(&self, tracer: Tracer) -> HttpState {
        let directory = HttpLocalityDirectory::new(
            Url::parse(&self.directory.uri()).expect("directory URL"),
            DEFAULT_DIRECTORY_TIMEOUT,
        )
        .expect("directory client");
        let weather = HttpWeatherProvider::new(
            Url::parse(&self.weather.uri()).expect("weather URL"),
            "test_key",
            DEFAULT_WEATHER_TIMEOUT,
        )
        .expect("weather client");
        HttpState::new(
            tracer,
            WeatherLookupService::new(Arc::new(directory), Arc::new(weather)),
        )
    }

    async fn directory_answers(&self, cep: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/ws/{cep}/json/")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.directory)
            .await;
    }

    async fn weather_answers(&self, template: ResponseTemplate, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("key", "test_key"))
            .and(query_param("aqi", "no"))
            .respond_with(template)
            .expect(expected_calls)
            .mount(&self.weather)
            .await;
    }
}

async fn post_weather(state: HttpState, payload: &'static str) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(TracePropagation)
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/weather")
        .set_payload(payload)
        .to_request();
    let res = test::call_service(&app, req).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

#[actix_web::test]
async fn resolves_locality_and_converts_temperature() {
    let upstreams = Upstreams::start().await;
    upstreams
        .directory_answers("01310100", json!({"localidade": "São Paulo", "uf": "SP"}))
        .await;
    upstreams
        .weather_answers(
            ResponseTemplate::new(200).set_body_json(json!({"current": {"temp_c": 25.0}})),
            1,
        )
        .await;
    let sink = Arc::new(RecordingSpanSink::default());

    let (status, body) = post_weather(
        upstreams.state(Tracer::new(sink.clone())),
        r#"{"cep":"01310100"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"city": "São Paulo", "temp_C": 25, "temp_F": 77, "temp_K": 298})
    );
    assert_eq!(
        sink.names(),
        vec!["lookup_cep", "get_temperature", "handle_weather"]
    );

    let requests = upstreams
        .weather
        .received_requests()
        .await
        .expect("recording enabled");
    let query: Vec<(String, String)> = requests
        .first()
        .expect("one weather call")
        .url
        .query_pairs()
        .into_owned()
        .collect();
    assert!(query.contains(&("q".to_owned(), "São Paulo".to_owned())));
}

#[rstest]
#[case::flagged(json!({"erro": true}))]
#[case::blank(json!({"localidade": ""}))]
#[actix_web::test]
async fn unknown_postal_code_is_not_found(#[case] directory_body: Value) {
    let upstreams = Upstreams::start().await;
    upstreams.directory_answers("99999999", directory_body).await;
    upstreams
        .weather_answers(ResponseTemplate::new(200), 0)
        .await;

    let (status, body) = post_weather(
        upstreams.state(Tracer::noop()),
        r#"{"cep":"99999999"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "can not find zipcode"}));
}

#[actix_web::test]
async fn short_code_is_rejected_before_any_lookup() {
    let upstreams = Upstreams::start().await;
    upstreams
        .weather_answers(ResponseTemplate::new(200), 0)
        .await;

    let (status, body) =
        post_weather(upstreams.state(Tracer::noop()), r#"{"cep":"123"}"#).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"message": "invalid zipcode"}));
    let directory_calls = upstreams
        .directory
        .received_requests()
        .await
        .expect("recording enabled");
    assert!(directory_calls.is_empty());
}

#[actix_web::test]
async fn weather_outage_is_reported_as_internal_error() {
    let upstreams = Upstreams::start().await;
    upstreams
        .directory_answers("20040002", json!({"localidade": "Rio de Janeiro"}))
        .await;
    upstreams
        .weather_answers(ResponseTemplate::new(503), 1)
        .await;

    let (status, body) = post_weather(
        upstreams.state(Tracer::noop()),
        r#"{"cep":"20040002"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "failed to get temperature"}));
}

#[actix_web::test]
async fn repeated_requests_are_independent() {
    let upstreams = Upstreams::start().await;
    upstreams
        .directory_answers("30130010", json!({"localidade": "Belo Horizonte"}))
        .await;
    upstreams
        .weather_answers(
            ResponseTemplate::new(200).set_body_json(json!({"current": {"temp_c": 22.5}})),
            2,
        )
        .await;
    let state = upstreams.state(Tracer::noop());

    let first = post_weather(state.clone(), r#"{"cep":"30130010"}"#).await;
    let second = post_weather(state, r#"{"cep":"30130010"}"#).await;

    assert_eq!(first, second);
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first.1["temp_K"], json!(295.5));
}
