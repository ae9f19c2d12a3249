//! Resolver entry-point: serves `/weather` and `/health` as `service-b`.

mod server;

use std::time::Duration;

use mockable::DefaultEnv;
use trace_context::Tracer;
use trace_context::otlp::{OtlpExporterSettings, OtlpHttpExporter};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ResolverConfig, create_server};

const SERVICE_NAME: &str = "service-b";
const EXPORTER_GRACE: Duration = Duration::from_secs(5);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ResolverConfig::from_env(&DefaultEnv::new()).map_err(std::io::Error::other)?;
    let (exporter, sink) = OtlpHttpExporter::spawn(OtlpExporterSettings::new(
        config.otlp_endpoint.clone(),
        SERVICE_NAME,
    ))
    .map_err(|e| std::io::Error::other(format!("span exporter: {e}")))?;
    let tracer = Tracer::new(sink);

    info!(
        service = SERVICE_NAME,
        bind_addr = %config.bind_addr,
        directory_url = %config.directory_url,
        weather_url = %config.weather_url,
        otlp_endpoint = %config.otlp_endpoint,
        "starting resolver"
    );
    let result = create_server(&config, tracer)?.await;
    exporter.shutdown(EXPORTER_GRACE).await;
    result
}
