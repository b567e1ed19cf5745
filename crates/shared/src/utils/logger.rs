use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Console output, daily JSON log files under `logs/`, and an OTLP bridge.
/// Keep the returned guard alive for the lifetime of the process.
pub fn init_logger(logger_provider: &SdkLoggerProvider, service_name: &str) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", format!("{service_name}.log"));
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let otel_layer = OpenTelemetryTracingBridge::new(logger_provider);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().json().with_writer(file_writer))
        .with(otel_layer)
        .init();

    guard
}
