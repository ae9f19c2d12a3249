//! W3C `traceparent` parsing and the per-request trace context.

use std::str::FromStr;

use thiserror::Error;

use crate::ids::{IdParseError, SpanId, TraceId};

/// Header carrying the propagated trace context between services.
pub const TRACEPARENT_HEADER: &str = "traceparent";

const SUPPORTED_VERSION: &str = "00";
const INVALID_VERSION: &str = "ff";
const SAMPLED_FLAG: u8 = 0x01;

/// Errors raised when a `traceparent` header cannot be honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TraceparentError {
    /// The header does not have the `version-trace-span-flags` shape.
    #[error("traceparent must have four dash-separated fields")]
    Malformed,
    /// The version field is not a two-digit hex value, or is `ff`.
    #[error("unsupported traceparent version")]
    UnsupportedVersion,
    /// The trace identifier field is invalid.
    #[error("invalid trace id: {0}")]
    TraceId(IdParseError),
    /// The parent span identifier field is invalid.
    #[error("invalid parent span id: {0}")]
    SpanId(IdParseError),
    /// The flags field is not a two-digit hex value.
    #[error("invalid trace flags")]
    Flags,
}

/// Position of one span inside a distributed trace.
///
/// # Examples
/// ```
/// use trace_context::TraceContext;
///
/// let header = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
/// let context: TraceContext = header.parse().expect("valid traceparent");
/// assert!(context.is_sampled());
/// assert_eq!(context.to_traceparent(), header);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceContext {
    trace_id: TraceId,
    span_id: SpanId,
    sampled: bool,
}

impl TraceContext {
    /// Start a new, sampled trace.
    #[must_use]
    pub fn new_root() -> Self {
        Self {
            trace_id: TraceId::generate(),
            span_id: SpanId::generate(),
            sampled: true,
        }
    }

    /// Derive a context for a new span inside the same trace.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id,
            span_id: SpanId::generate(),
            sampled: self.sampled,
        }
    }

    /// Trace identifier shared by all spans of the request.
    #[must_use]
    pub const fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Identifier of the span this context describes.
    #[must_use]
    pub const fn span_id(&self) -> SpanId {
        self.span_id
    }

    /// Whether the upstream caller asked for this trace to be recorded.
    #[must_use]
    pub const fn is_sampled(&self) -> bool {
        self.sampled
    }

    /// Render the context as a version-00 `traceparent` header value.
    #[must_use]
    pub fn to_traceparent(&self) -> String {
        let flags = if self.sampled { SAMPLED_FLAG } else { 0 };
        format!(
            "{SUPPORTED_VERSION}-{}-{}-{flags:02x}",
            self.trace_id, self.span_id
        )
    }
}

impl FromStr for TraceContext {
    type Err = TraceparentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.trim().split('-');
        let (Some(version), Some(trace_field), Some(span_field), Some(flags_field)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(TraceparentError::Malformed);
        };

        if parse_hex_byte(version).is_none() || version.eq_ignore_ascii_case(INVALID_VERSION) {
            return Err(TraceparentError::UnsupportedVersion);
        }
        // Version 00 has exactly four fields; later versions may append more.
        if version == SUPPORTED_VERSION && fields.next().is_some() {
            return Err(TraceparentError::Malformed);
        }

        let trace_id = trace_field.parse().map_err(TraceparentError::TraceId)?;
        let span_id = span_field.parse().map_err(TraceparentError::SpanId)?;
        let flags = parse_hex_byte(flags_field).ok_or(TraceparentError::Flags)?;

        Ok(Self {
            trace_id,
            span_id,
            sampled: flags & SAMPLED_FLAG == SAMPLED_FLAG,
        })
    }
}

fn parse_hex_byte(field: &str) -> Option<u8> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(field, 16).ok()
}

/// Trace context attached to one inbound request.
///
/// When the caller propagated a valid `traceparent`, the request joins that
/// trace and the server span becomes a child of the caller's span. Otherwise a
/// fresh root context is minted and the server span takes its identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTrace {
    context: TraceContext,
    propagated: bool,
}

impl RequestTrace {
    /// Build the request trace from an optional `traceparent` header value.
    ///
    /// Invalid headers are ignored, as the W3C recommendation requires.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::parse::<TraceContext>) {
            Some(Ok(context)) => Self {
                context,
                propagated: true,
            },
            Some(Err(error)) => {
                tracing::debug!(%error, "ignoring invalid traceparent header");
                Self::root()
            }
            None => Self::root(),
        }
    }

    /// Start a new trace for a request that carried no usable context.
    #[must_use]
    pub fn root() -> Self {
        Self {
            context: TraceContext::new_root(),
            propagated: false,
        }
    }

    /// Context received from the caller, or the freshly minted root.
    #[must_use]
    pub const fn context(&self) -> &TraceContext {
        &self.context
    }

    /// Trace identifier for log correlation and response headers.
    #[must_use]
    pub const fn trace_id(&self) -> TraceId {
        self.context.trace_id
    }

    /// Whether the caller propagated this context.
    #[must_use]
    pub const fn is_propagated(&self) -> bool {
        self.propagated
    }
}
