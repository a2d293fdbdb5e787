use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    plans_total: AtomicU64,
    validation_failures_total: AtomicU64,
    upstream_failures_total: AtomicU64,
    total_latency_micros: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub plans_total: u64,
    pub validation_failures_total: u64,
    pub upstream_failures_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_plan(&self) {
        self.plans_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_validation_failure(&self) {
        self.validation_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_upstream_failure(&self) {
        self.upstream_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    // Plans finish in microseconds, so millisecond buckets would read as zero.
    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            plans_total: self.plans_total.load(Ordering::Relaxed),
            validation_failures_total: self.validation_failures_total.load(Ordering::Relaxed),
            upstream_failures_total: self.upstream_failures_total.load(Ordering::Relaxed),
            avg_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64 / 1_000.0
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(default_filter(service_name))
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}

/// Same JSON logs, written to stderr so stdout stays free for command output.
pub fn init_cli_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(default_filter(service_name))
            .with_writer(std::io::stderr)
            .init();
    });
}

fn default_filter(service_name: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,wayfarer_api=info,wayfarer_agents=info,wayfarer_upstream=info",
            service_name
        ))
    })
}
