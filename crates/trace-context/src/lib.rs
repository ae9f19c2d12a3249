//! W3C trace-context propagation and span export for the CEP weather services.
//!
//! Each service builds one [`Tracer`] at startup and keeps it in its HTTP
//! state. The [`TracePropagation`] middleware turns the inbound `traceparent`
//! header into a [`RequestTrace`]; handlers open a server span from it and
//! nest client spans around outbound calls, injecting
//! [`TraceContext::to_traceparent`] into each request they make.

mod context;
mod endpoint;
mod ids;
mod middleware;
pub mod otlp;
mod sink;
mod span;

pub use context::{RequestTrace, TRACEPARENT_HEADER, TraceContext, TraceparentError};
pub use endpoint::{DEFAULT_OTLP_ENDPOINT, OTLP_ENDPOINT_ENV, collector_endpoint, strip_scheme};
pub use ids::{IdParseError, SpanId, TraceId};
pub use middleware::{TRACE_ID_HEADER, TracePropagation, TracePropagationMiddleware};
#[cfg(any(test, feature = "test-support"))]
pub use sink::RecordingSpanSink;
pub use sink::{NoopSpanSink, SpanSink};
pub use span::{AttributeValue, FinishedSpan, Span, SpanKind, SpanStatus, Tracer};
