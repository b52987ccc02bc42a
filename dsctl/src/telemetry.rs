//! Tracing setup: console logging plus optional OpenTelemetry export.
//!
//! OTLP export is off unless `enable_otel_export` is set. When on, the exporter is configured by
//! the standard OpenTelemetry environment variables:
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - collector URL (default `http://localhost:4318`)
//! - `OTEL_EXPORTER_OTLP_PROTOCOL` - `http/protobuf` (default) or `http/json`
//! - `OTEL_EXPORTER_OTLP_HEADERS` - comma-separated `key=value` pairs, `%20` decodes to a space
//! - `OTEL_SERVICE_NAME` - resource service name (default `dsctl`)
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{Protocol, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_SERVICE_NAME: &str = "dsctl";
const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4318";

// tracing-opentelemetry holds only the tracer, so the provider is kept here for shutdown
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Install the global subscriber.
///
/// A failure to build the OTLP exporter is logged and the service continues with console
/// output only.
pub fn init_telemetry(enable_otel_export: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (otel_layer, otel_error) = if enable_otel_export {
        match create_otlp_tracer() {
            Ok(tracer) => (Some(tracing_opentelemetry::layer().with_tracer(tracer)), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };
    let exporting = otel_layer.is_some();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .try_init()?;

    match (enable_otel_export, exporting, otel_error) {
        (_, true, _) => info!("Telemetry initialized with OTLP export enabled"),
        (true, false, Some(e)) => warn!("Telemetry initialized without OTLP export: {e:#}"),
        _ => info!("Telemetry initialized (OTLP export disabled)"),
    }

    Ok(())
}

fn create_otlp_tracer() -> anyhow::Result<opentelemetry_sdk::trace::Tracer> {
    let service_name = std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").unwrap_or_else(|_| DEFAULT_OTLP_ENDPOINT.to_string());
    let headers = std::env::var("OTEL_EXPORTER_OTLP_HEADERS")
        .map(|raw| parse_otlp_headers(&raw))
        .unwrap_or_default();
    let protocol = parse_protocol(std::env::var("OTEL_EXPORTER_OTLP_PROTOCOL").ok().as_deref());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(&endpoint)
        .with_protocol(protocol)
        .with_headers(headers)
        .build()?;

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            opentelemetry_sdk::Resource::builder()
                .with_attribute(KeyValue::new("service.name", service_name.clone()))
                .build(),
        )
        .build();

    let tracer = tracer_provider.tracer(service_name);
    let _ = TRACER_PROVIDER.set(tracer_provider);

    Ok(tracer)
}

/// Parse `OTEL_EXPORTER_OTLP_HEADERS` into a header map.
fn parse_otlp_headers(raw: &str) -> HashMap<String, String> {
    raw.replace("%20", " ")
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn parse_protocol(raw: Option<&str>) -> Protocol {
    match raw {
        Some("http/json") => Protocol::HttpJson,
        _ => Protocol::HttpBinary,
    }
}

/// Flush and shut down the OTLP exporter, if one was installed.
pub fn shutdown_telemetry() {
    if let Some(provider) = TRACER_PROVIDER.get()
        && let Err(e) = provider.shutdown()
    {
        tracing::error!("Failed to shutdown tracer provider: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_otlp_headers() {
        let headers = parse_otlp_headers("Authorization=Basic%20abc123, x-tenant = datasets ,malformed,=nokey");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["Authorization"], "Basic abc123");
        assert_eq!(headers["x-tenant"], "datasets");
    }

    #[test]
    fn test_parse_protocol_defaults_to_binary() {
        assert!(matches!(parse_protocol(Some("http/json")), Protocol::HttpJson));
        assert!(matches!(parse_protocol(Some("grpc")), Protocol::HttpBinary));
        assert!(matches!(parse_protocol(None), Protocol::HttpBinary));
    }
}
