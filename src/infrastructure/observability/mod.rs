//! Observability infrastructure - Metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_document_cache, record_http_request,
    record_rate_limit_decision, CacheLookup, PrometheusMetrics,
};
