//! Actix middleware that joins inbound requests to the caller's trace.
//!
//! The middleware parses the `traceparent` header once, stores the resulting
//! [`RequestTrace`] in the request extensions and echoes the trace identifier
//! in a `trace-id` response header. Handlers take `RequestTrace` as an
//! extractor.

use std::task::{Context, Poll};

use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::context::{RequestTrace, TRACEPARENT_HEADER};

/// Response header carrying the 32-hex trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

fn inbound_trace(headers: &actix_web::http::header::HeaderMap) -> RequestTrace {
    RequestTrace::from_header(
        headers
            .get(TRACEPARENT_HEADER)
            .and_then(|value| value.to_str().ok()),
    )
}

/// Middleware factory; wrap an `App` with it.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use trace_context::TracePropagation;
///
/// let app = App::new().wrap(TracePropagation);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracePropagation;

impl<S, B> Transform<S, ServiceRequest> for TracePropagation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TracePropagationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TracePropagationMiddleware { service }))
    }
}

/// Service wrapper produced by [`TracePropagation`].
pub struct TracePropagationMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TracePropagationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace = inbound_trace(req.headers());
        req.extensions_mut().insert(trace);
        let trace_id = trace.trace_id();
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            let header = HeaderValue::from_str(&trace_id.to_string()).map_err(|error| {
                error!(%error, %trace_id, "failed to encode trace identifier header");
            });
            if let Ok(value) = header {
                res.response_mut()
                    .headers_mut()
                    .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
            }
            Ok(res)
        })
    }
}

impl FromRequest for RequestTrace {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let stored = req.extensions().get::<Self>().copied();
        ready(Ok(stored.unwrap_or_else(|| inbound_trace(req.headers()))))
    }
}
