//! `/cep` handler.
//!
//! ```text
//! POST /cep {"cep":"01310100"}
//! ```
//!
//! Valid codes are forwarded to the resolver and its status and body are
//! relayed unchanged.

use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde::Deserialize;
use trace_context::{RequestTrace, Span, SpanKind};
use tracing::{debug, error};

use crate::domain::ports::ReplyBody;
use crate::domain::{DomainError, PostalCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::request_body::{MAX_BODY_BYTES, read_first_value};
use crate::inbound::http::state::HttpState;

/// Server span covering one `/cep` request.
pub const HANDLE_CEP_SPAN: &str = "handle_cep";
/// Client span covering the call to the resolver.
pub const CALL_RESOLVER_SPAN: &str = "call_resolver";

#[derive(Debug, Default, Deserialize)]
struct CepRequest {
    #[serde(default)]
    cep: Option<String>,
}

/// Validate the CEP and relay the resolver's answer.
pub async fn handle_cep(
    req: HttpRequest,
    trace: RequestTrace,
    state: web::Data<HttpState>,
    body: web::Payload,
) -> ApiResult<HttpResponse> {
    let mut span = state.tracer.start_server_span(HANDLE_CEP_SPAN, &trace);
    span.set_attribute("http.request.method", req.method().as_str());

    match delegate(req.method(), body, &state, &span).await {
        Ok((status, reply_body)) => {
            span.set_attribute("http.response.status_code", status.as_u16());
            span.set_ok();
            Ok(HttpResponse::build(status)
                .content_type("application/json")
                .streaming(reply_body))
        }
        Err(err) => {
            span.set_attribute("http.response.status_code", err.status_code().as_u16());
            span.record_error(err.message());
            Err(err)
        }
    }
}

async fn delegate(
    method: &Method,
    body: web::Payload,
    state: &HttpState,
    span: &Span,
) -> Result<(StatusCode, ReplyBody), DomainError> {
    let trace_id = span.trace_id();
    if method != Method::POST {
        debug!(%trace_id, %method, "rejecting non-POST request");
        return Err(DomainError::method_not_allowed());
    }

    // `null` and a missing or null `cep` all validate as "".
    let request: Option<CepRequest> = read_first_value(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| {
            debug!(%trace_id, error = %err, "rejecting malformed request body");
            DomainError::invalid_request()
        })?;
    let cep = request.unwrap_or_default().cep.unwrap_or_default();

    let code = PostalCode::parse(&cep).map_err(|err| {
        debug!(%trace_id, error = %err, "rejecting invalid postal code");
        DomainError::invalid_postal_code()
    })?;

    let mut call = span.child(CALL_RESOLVER_SPAN, SpanKind::Client);
    call.set_attribute("postal_code", code.as_str());
    let outcome = state.resolver.resolve(&code, call.context()).await;
    let reply = outcome.map_err(|err| {
        error!(%trace_id, error = %err, "resolver call failed");
        call.record_error(err.to_string());
        DomainError::internal()
    })?;

    let (raw_status, reply_body) = reply.into_parts();
    call.set_attribute("http.response.status_code", raw_status);
    let status = StatusCode::from_u16(raw_status).map_err(|err| {
        error!(
            %trace_id,
            status = raw_status,
            error = %err,
            "resolver answered with an invalid status"
        );
        call.record_error(err.to_string());
        DomainError::internal()
    })?;
    if status.is_server_error() {
        call.record_error(format!("resolver answered {}", status.as_u16()));
    } else {
        call.set_ok();
    }
    Ok((status, reply_body))
}

#[cfg(test)]
#[path = "cep_tests.rs"]
mod tests;
