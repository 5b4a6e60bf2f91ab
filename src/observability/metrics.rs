//! Metrics for the works catalog.
//!
//! Counters are recorded through the `metrics` facade and are no-ops until a
//! recorder is installed with [`init`].

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use tracing::info;

/// Every metric name used in the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    FetchSuccess,
    FetchError,
    FetchAborted,
    WorksLoaded,
    CacheHit,
    CacheMiss,
    ShareCompleted,
    ShareFailed,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::FetchSuccess => "ucp_works_fetch_success_total",
            MetricName::FetchError => "ucp_works_fetch_error_total",
            MetricName::FetchAborted => "ucp_works_fetch_aborted_total",
            MetricName::WorksLoaded => "ucp_works_loaded",
            MetricName::CacheHit => "ucp_works_cache_hit_total",
            MetricName::CacheMiss => "ucp_works_cache_miss_total",
            MetricName::ShareCompleted => "ucp_works_share_completed_total",
            MetricName::ShareFailed => "ucp_works_share_failed_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Installs the Prometheus recorder. The handle renders the text exposition format.
pub fn init() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    info!("Metrics recorder installed");
    Ok(handle)
}

pub mod fetch {
    use super::MetricName;

    pub fn success(items: usize) {
        ::metrics::counter!(MetricName::FetchSuccess.as_str()).increment(1);
        ::metrics::gauge!(MetricName::WorksLoaded.as_str()).set(items as f64);
    }

    pub fn error() {
        ::metrics::counter!(MetricName::FetchError.as_str()).increment(1);
    }

    pub fn aborted() {
        ::metrics::counter!(MetricName::FetchAborted.as_str()).increment(1);
    }
}

pub mod cache {
    use super::MetricName;

    pub fn hit() {
        ::metrics::counter!(MetricName::CacheHit.as_str()).increment(1);
    }

    pub fn miss() {
        ::metrics::counter!(MetricName::CacheMiss.as_str()).increment(1);
    }
}

pub mod share {
    use super::MetricName;

    pub fn completed() {
        ::metrics::counter!(MetricName::ShareCompleted.as_str()).increment(1);
    }

    pub fn failed() {
        ::metrics::counter!(MetricName::ShareFailed.as_str()).increment(1);
    }
}
