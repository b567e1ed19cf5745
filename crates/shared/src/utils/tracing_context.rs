use crate::{
    domain::response::ErrorResponse,
    utils::{AppError, Method, Metrics, Status},
};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info};

pub struct TracingContext {
    pub cx: Context,
    pub start_time: Instant,
}

/// Span and metrics bookkeeping shared by every service.
#[derive(Clone)]
pub struct ServiceTracer {
    component: &'static str,
    metrics: Arc<Metrics>,
}

impl ServiceTracer {
    pub fn new(component: &'static str, metrics: Arc<Metrics>) -> Self {
        Self { component, metrics }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer(self.component)
    }

    pub fn start_tracing(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.get_tracer();
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![
                KeyValue::new("operation", operation_name.to_string()),
                KeyValue::new("component", self.component),
            ],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    pub fn complete_tracing_success(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        message: &str,
    ) {
        self.complete_tracing_internal(tracing_ctx, method, true, message);
    }

    pub fn complete_tracing_error(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        error_message: &str,
    ) {
        self.complete_tracing_internal(tracing_ctx, method, false, error_message);
    }

    /// Closes the span according to `result` and converts a failure into
    /// the error envelope.
    pub fn finish<T>(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        result: Result<T, AppError>,
        success_message: &str,
    ) -> Result<T, ErrorResponse> {
        match result {
            Ok(value) => {
                self.complete_tracing_success(tracing_ctx, method, success_message);
                Ok(value)
            }
            Err(err) => {
                self.complete_tracing_error(tracing_ctx, method, &err.to_string());
                Err(ErrorResponse::from(err))
            }
        }
    }

    fn complete_tracing_internal(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        is_success: bool,
        message: &str,
    ) {
        let status_str = if is_success { "SUCCESS" } else { "ERROR" };
        let status = if is_success {
            Status::Success
        } else {
            Status::Error
        };
        let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();

        tracing_ctx.cx.span().add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("Operation completed successfully: {message}");
        } else {
            error!("Operation failed: {message}");
        }

        self.metrics.record(self.component, method, status, elapsed);

        tracing_ctx.cx.span().end();
    }
}
