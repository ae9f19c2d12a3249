//! Conversion of finished spans into OTLP protobuf messages.

use std::time::{SystemTime, UNIX_EPOCH};

use opentelemetry_proto::tonic::collector::trace::v1::ExportTraceServiceRequest;
use opentelemetry_proto::tonic::common::v1::{AnyValue, InstrumentationScope, KeyValue, any_value};
use opentelemetry_proto::tonic::resource::v1::Resource;
use opentelemetry_proto::tonic::trace::v1::{ResourceSpans, ScopeSpans, Span, Status, span, status};

use crate::span::{AttributeValue, FinishedSpan, SpanKind, SpanStatus};

const INSTRUMENTATION_SCOPE_NAME: &str = "trace-context";

/// Wrap `spans` in one export request tagged with `service.name`.
pub(super) fn export_request(
    service_name: &str,
    spans: Vec<FinishedSpan>,
) -> ExportTraceServiceRequest {
    let scope_spans = ScopeSpans {
        scope: Some(InstrumentationScope {
            name: INSTRUMENTATION_SCOPE_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            ..Default::default()
        }),
        spans: spans.into_iter().map(to_span).collect(),
        ..Default::default()
    };
    ExportTraceServiceRequest {
        resource_spans: vec![ResourceSpans {
            resource: Some(Resource {
                attributes: vec![key_value("service.name", AttributeValue::from(service_name))],
                ..Default::default()
            }),
            scope_spans: vec![scope_spans],
            ..Default::default()
        }],
    }
}

fn to_span(finished: FinishedSpan) -> Span {
    Span {
        trace_id: finished.trace_id.as_bytes().to_vec(),
        span_id: finished.span_id.as_bytes().to_vec(),
        parent_span_id: finished
            .parent_span_id
            .map_or_else(Vec::new, |id| id.as_bytes().to_vec()),
        name: finished.name.to_owned(),
        kind: kind_code(finished.kind),
        start_time_unix_nano: unix_nanos(finished.start),
        end_time_unix_nano: unix_nanos(finished.end),
        attributes: finished
            .attributes
            .into_iter()
            .map(|(key, value)| key_value(key, value))
            .collect(),
        status: Some(status_message(finished.status)),
        ..Default::default()
    }
}

fn key_value(key: &str, value: AttributeValue) -> KeyValue {
    let typed = match value {
        AttributeValue::String(text) => any_value::Value::StringValue(text),
        AttributeValue::Int(number) => any_value::Value::IntValue(number),
        AttributeValue::Float(number) => any_value::Value::DoubleValue(number),
        AttributeValue::Bool(flag) => any_value::Value::BoolValue(flag),
    };
    KeyValue {
        key: key.to_owned(),
        value: Some(AnyValue { value: Some(typed) }),
    }
}

fn kind_code(kind: SpanKind) -> i32 {
    let proto_kind = match kind {
        SpanKind::Internal => span::SpanKind::Internal,
        SpanKind::Server => span::SpanKind::Server,
        SpanKind::Client => span::SpanKind::Client,
    };
    proto_kind as i32
}

fn status_message(outcome: SpanStatus) -> Status {
    let (code, message) = match outcome {
        SpanStatus::Unset => (status::StatusCode::Unset, String::new()),
        SpanStatus::Ok => (status::StatusCode::Ok, String::new()),
        SpanStatus::Error(message) => (status::StatusCode::Error, message),
    };
    Status {
        message,
        code: code as i32,
    }
}

fn unix_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).map_or(0, |elapsed| {
        u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
    })
}
