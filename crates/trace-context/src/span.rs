//! Spans and the tracer that starts them.
//!
//! A [`Tracer`] is an explicit value held in each service's HTTP state. It is
//! cloned into handlers and passed down the request path instead of living in
//! a process-wide global, so tests can swap the sink for a recording or no-op
//! one.

use std::mem;
use std::sync::Arc;
use std::time::SystemTime;

use crate::context::{RequestTrace, TraceContext};
use crate::ids::{SpanId, TraceId};
use crate::sink::{NoopSpanSink, SpanSink};

/// Role a span plays in the request, mirroring the OTLP span kinds we emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Work performed inside the service.
    Internal,
    /// Handling of an inbound request.
    Server,
    /// An outbound call to another service.
    Client,
}

/// Final outcome attached to a span.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SpanStatus {
    /// No outcome was recorded.
    #[default]
    Unset,
    /// The operation completed successfully.
    Ok,
    /// The operation failed with the given description.
    Error(String),
}

/// Attribute value recorded on a span.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Text attribute.
    String(String),
    /// Integer attribute.
    Int(i64),
    /// Floating-point attribute.
    Float(f64),
    /// Boolean attribute.
    Bool(bool),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u16> for AttributeValue {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A completed span handed to a [`SpanSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedSpan {
    /// Operation name.
    pub name: &'static str,
    /// Span kind.
    pub kind: SpanKind,
    /// Trace the span belongs to.
    pub trace_id: TraceId,
    /// Identifier of this span.
    pub span_id: SpanId,
    /// Parent span, absent for trace roots.
    pub parent_span_id: Option<SpanId>,
    /// Wall-clock start time.
    pub start: SystemTime,
    /// Wall-clock end time.
    pub end: SystemTime,
    /// Recorded attributes in insertion order.
    pub attributes: Vec<(&'static str, AttributeValue)>,
    /// Final status.
    pub status: SpanStatus,
}

impl FinishedSpan {
    /// Look up an attribute by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }
}

/// Starts spans for one service and forwards finished spans to a sink.
///
/// # Examples
/// ```
/// use trace_context::{RequestTrace, Tracer};
///
/// let tracer = Tracer::noop();
/// let request = RequestTrace::root();
/// let span = tracer.start_server_span("handle_cep", &request);
/// assert_eq!(span.context().trace_id(), request.trace_id());
/// ```
#[derive(Clone)]
pub struct Tracer {
    sink: Arc<dyn SpanSink>,
}

impl Tracer {
    /// Build a tracer that reports spans to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn SpanSink>) -> Self {
        Self { sink }
    }

    /// Build a tracer that discards every span.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Arc::new(NoopSpanSink))
    }

    /// Start the span covering the handling of one inbound request.
    #[must_use]
    pub fn start_server_span(&self, name: &'static str, request: &RequestTrace) -> Span {
        let (context, parent_span_id) = if request.is_propagated() {
            let remote = request.context();
            (remote.child(), Some(remote.span_id()))
        } else {
            (*request.context(), None)
        };
        Span::start(self.clone(), name, SpanKind::Server, context, parent_span_id)
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// An in-flight span. It is reported to the sink when dropped.
#[derive(Debug)]
pub struct Span {
    tracer: Tracer,
    name: &'static str,
    kind: SpanKind,
    context: TraceContext,
    parent_span_id: Option<SpanId>,
    start: SystemTime,
    attributes: Vec<(&'static str, AttributeValue)>,
    status: SpanStatus,
}

impl Span {
    fn start(
        tracer: Tracer,
        name: &'static str,
        kind: SpanKind,
        context: TraceContext,
        parent_span_id: Option<SpanId>,
    ) -> Self {
        Self {
            tracer,
            name,
            kind,
            context,
            parent_span_id,
            start: SystemTime::now(),
            attributes: Vec::new(),
            status: SpanStatus::Unset,
        }
    }

    /// Start a nested span in the same trace.
    #[must_use]
    pub fn child(&self, name: &'static str, kind: SpanKind) -> Self {
        Self::start(
            self.tracer.clone(),
            name,
            kind,
            self.context.child(),
            Some(self.context.span_id()),
        )
    }

    /// Context to propagate to downstream calls made under this span.
    #[must_use]
    pub const fn context(&self) -> &TraceContext {
        &self.context
    }

    /// Trace identifier, handy for log fields.
    #[must_use]
    pub const fn trace_id(&self) -> TraceId {
        self.context.trace_id()
    }

    /// Record an attribute; later values for the same key are appended.
    pub fn set_attribute(&mut self, key: &'static str, value: impl Into<AttributeValue>) {
        self.attributes.push((key, value.into()));
    }

    /// Mark the span as successful.
    pub fn set_ok(&mut self) {
        self.status = SpanStatus::Ok;
    }

    /// Mark the span as failed.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.status = SpanStatus::Error(message.into());
    }

    /// Finish the span now rather than at the end of scope.
    pub fn end(self) {
        drop(self);
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        // Unsampled traces still propagate, but nothing is reported.
        if !self.context.is_sampled() {
            return;
        }
        let finished = FinishedSpan {
            name: self.name,
            kind: self.kind,
            trace_id: self.context.trace_id(),
            span_id: self.context.span_id(),
            parent_span_id: self.parent_span_id,
            start: self.start,
            end: SystemTime::now(),
            attributes: mem::take(&mut self.attributes),
            status: mem::take(&mut self.status),
        };
        self.tracer.sink.export(finished);
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for span parentage and reporting.
    use super::*;
    use crate::sink::RecordingSpanSink;

    const REMOTE: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn recording_tracer() -> (Tracer, Arc<RecordingSpanSink>) {
        let sink = Arc::new(RecordingSpanSink::default());
        (Tracer::new(sink.clone()), sink)
    }

    #[test]
    fn server_span_joins_propagated_trace() {
        let (tracer, sink) = recording_tracer();
        let request = RequestTrace::from_header(Some(REMOTE));

        tracer.start_server_span("handle", &request).end();

        let spans = sink.spans();
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.trace_id, request.trace_id());
        assert_eq!(span.parent_span_id, Some(request.context().span_id()));
        assert_ne!(span.span_id, request.context().span_id());
        assert_eq!(span.kind, SpanKind::Server);
    }

    #[test]
    fn server_span_is_root_without_propagation() {
        let (tracer, sink) = recording_tracer();
        let request = RequestTrace::root();

        drop(tracer.start_server_span("handle", &request));

        let span = sink.single("handle");
        assert_eq!(span.parent_span_id, None);
        assert_eq!(span.span_id, request.context().span_id());
    }

    #[test]
    fn child_spans_report_before_parent_and_link_to_it() {
        let (tracer, sink) = recording_tracer();
        let parent = tracer.start_server_span("parent", &RequestTrace::root());
        let parent_id = parent.context().span_id();
        {
            let mut child = parent.child("child", SpanKind::Client);
            child.set_attribute("http.response.status_code", 503_u16);
            child.record_error("boom");
        }
        parent.end();

        let spans = sink.spans();
        assert_eq!(spans[0].name, "child");
        assert_eq!(spans[1].name, "parent");
        assert_eq!(spans[0].parent_span_id, Some(parent_id));
        assert_eq!(spans[0].status, SpanStatus::Error("boom".to_owned()));
        assert_eq!(
            spans[0].attribute("http.response.status_code"),
            Some(&AttributeValue::Int(503))
        );
    }

    #[test]
    fn noop_tracer_still_propagates_context() {
        let tracer = Tracer::noop();
        let request = RequestTrace::from_header(Some(REMOTE));
        let span = tracer.start_server_span("handle", &request);
        assert_eq!(span.trace_id(), request.trace_id());
    }

    #[test]
    fn unsampled_traces_propagate_without_reporting() {
        let (tracer, sink) = recording_tracer();
        let request = RequestTrace::from_header(Some(
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-00",
        ));
        let server = tracer.start_server_span("handle", &request);
        let client = server.child("call", SpanKind::Client);

        assert!(!client.context().is_sampled());
        assert!(client.context().to_traceparent().ends_with("-00"));
        assert_eq!(client.trace_id(), request.trace_id());
        drop(client);
        server.end();

        assert!(sink.spans().is_empty());
    }
}
