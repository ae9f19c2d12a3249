//! `/weather` handler.
//!
//! ```text
//! POST /weather {"cep":"01310100"}
//! 200 {"city":"São Paulo","temp_C":25,"temp_F":77,"temp_K":298}
//! ```

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde::{Deserialize, Serialize, Serializer};
use trace_context::{RequestTrace, Span};
use tracing::debug;

use crate::domain::{DomainError, PostalCode, TemperatureReading};
use crate::inbound::http::ApiResult;
use crate::inbound::http::request_body::{MAX_BODY_BYTES, read_first_value};
use crate::inbound::http::state::HttpState;

/// Server span covering one `/weather` request.
pub const HANDLE_WEATHER_SPAN: &str = "handle_weather";

// A missing or null `cep` reaches validation as "" and fails there.
#[derive(Debug, Default, Deserialize)]
struct WeatherRequest {
    #[serde(default)]
    cep: Option<String>,
}

/// Success body. Whole numbers are written without a fractional part.
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    city: String,
    #[serde(rename = "temp_C", serialize_with = "whole_number")]
    temp_c: f64,
    #[serde(rename = "temp_F", serialize_with = "whole_number")]
    temp_f: f64,
    #[serde(rename = "temp_K", serialize_with = "whole_number")]
    temp_k: f64,
}

impl From<TemperatureReading> for WeatherResponse {
    fn from(reading: TemperatureReading) -> Self {
        Self {
            temp_c: reading.celsius(),
            temp_f: reading.fahrenheit(),
            temp_k: reading.kelvin(),
            city: reading.locality().as_str().to_owned(),
        }
    }
}

// 2^53; every whole f64 below it has an exact i64 form.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

#[expect(
    clippy::cast_possible_truncation,
    reason = "only whole values below 2^53 are cast"
)]
fn whole_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Resolve the weather for the posted CEP.
pub async fn resolve_weather(
    req: HttpRequest,
    trace: RequestTrace,
    state: web::Data<HttpState>,
    body: web::Payload,
) -> ApiResult<HttpResponse> {
    let mut span = state.tracer.start_server_span(HANDLE_WEATHER_SPAN, &trace);
    span.set_attribute("http.request.method", req.method().as_str());

    let outcome = handle(req.method(), body, &state, &span).await;
    match &outcome {
        Ok(_) => {
            span.set_attribute("http.response.status_code", 200_u16);
            span.set_ok();
        }
        Err(error) => {
            span.set_attribute("http.response.status_code", error.status_code().as_u16());
            span.record_error(error.message());
        }
    }
    outcome.map(|reading| HttpResponse::Ok().json(WeatherResponse::from(reading)))
}

async fn handle(
    method: &Method,
    body: web::Payload,
    state: &HttpState,
    span: &Span,
) -> Result<TemperatureReading, DomainError> {
    let trace_id = span.trace_id();
    if method != Method::POST {
        debug!(%trace_id, %method, "rejecting non-POST request");
        return Err(DomainError::method_not_allowed());
    }

    let request: Option<WeatherRequest> = read_first_value(body, MAX_BODY_BYTES)
        .await
        .map_err(|error| {
            debug!(%trace_id, %error, "rejecting malformed request body");
            DomainError::invalid_request()
        })?;
    let cep = request.unwrap_or_default().cep.unwrap_or_default();

    let code = PostalCode::parse(&cep).map_err(|error| {
        debug!(%trace_id, %error, "rejecting invalid postal code");
        DomainError::invalid_postal_code()
    })?;

    state.weather.resolve(&code, span).await
}

#[cfg(test)]
#[path = "weather_tests.rs"]
mod tests;
