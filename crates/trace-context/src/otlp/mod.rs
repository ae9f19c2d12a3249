//! OTLP/HTTP export of finished spans.

mod exporter;
mod proto;

pub use exporter::{OtlpExporterSettings, OtlpHttpExporter, OtlpHttpSink};
