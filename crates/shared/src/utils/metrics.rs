use prometheus_client::{
    encoding::{EncodeLabelSet, EncodeLabelValue},
    metrics::{
        counter::Counter,
        family::Family,
        gauge::Gauge,
        histogram::{Histogram, exponential_buckets},
    },
    registry::Registry,
};
use std::{
    sync::{Arc, atomic::AtomicU64},
    time::Duration,
};
use sysinfo::System;
use tracing::debug;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Status {
    Success,
    Error,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MethodLabels {
    pub service: String,
    pub method: Method,
    pub status: Status,
}

fn duration_histogram() -> Histogram {
    Histogram::new(exponential_buckets(0.005, 2.0, 12))
}

#[derive(Debug)]
pub struct Metrics {
    pub request_counter: Family<MethodLabels, Counter>,
    pub request_duration: Family<MethodLabels, Histogram>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            request_counter: Family::default(),
            request_duration: Family::new_with_constructor(
                duration_histogram as fn() -> Histogram,
            ),
        }
    }

    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "service_requests",
            "Total number of service operations",
            self.request_counter.clone(),
        );
        registry.register(
            "service_request_duration_seconds",
            "Histogram of service operation durations",
            self.request_duration.clone(),
        );
    }

    pub fn record(&self, service: &str, method: Method, status: Status, duration_secs: f64) {
        let labels = MethodLabels {
            service: service.to_string(),
            method,
            status,
        };

        self.request_counter.get_or_create(&labels).inc();
        self.request_duration
            .get_or_create(&labels)
            .observe(duration_secs);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct SystemMetrics {
    cpu_usage: Gauge<f64, AtomicU64>,
    memory_used_bytes: Gauge,
    memory_total_bytes: Gauge,
}

impl SystemMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "system_cpu_usage_percent",
            "Global CPU usage",
            self.cpu_usage.clone(),
        );
        registry.register(
            "system_memory_used_bytes",
            "Used memory in bytes",
            self.memory_used_bytes.clone(),
        );
        registry.register(
            "system_memory_total_bytes",
            "Total memory in bytes",
            self.memory_total_bytes.clone(),
        );
    }

    fn update(&self, system: &System) {
        self.cpu_usage.set(system.global_cpu_usage() as f64);
        self.memory_used_bytes
            .set(i64::try_from(system.used_memory()).unwrap_or(i64::MAX));
        self.memory_total_bytes
            .set(i64::try_from(system.total_memory()).unwrap_or(i64::MAX));
    }
}

pub async fn run_metrics_collector(metrics: Arc<SystemMetrics>) {
    let mut system = System::new();
    let mut interval = tokio::time::interval(Duration::from_secs(15));

    loop {
        interval.tick().await;

        system.refresh_cpu_usage();
        system.refresh_memory();
        metrics.update(&system);

        debug!("System metrics refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;

    #[test]
    fn records_are_exported_with_service_label() {
        let metrics = Metrics::new();
        let mut registry = Registry::default();
        metrics.register(&mut registry);

        metrics.record("budget-service", Method::Post, Status::Success, 0.02);
        metrics.record("budget-service", Method::Post, Status::Success, 0.04);

        let mut buffer = String::new();
        encode(&mut buffer, &registry).unwrap();

        assert!(buffer.contains("service_requests_total"));
        assert!(buffer.contains("service=\"budget-service\""));
        assert!(buffer.contains("} 2"));
    }
}
