//! Prometheus metrics for system-contract calls.
//!
//! [`SystemContractMetrics`] owns its own [`Registry`] so an embedding node can
//! encode it next to its other collectors.

use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec_with_registry, HistogramOpts, HistogramTimer, HistogramVec, Registry};

/// Histogram of system-contract call durations, labelled by method name.
pub const CALL_DURATION_SECONDS: &str = "system_contract_call_duration_seconds";

static METRICS: Lazy<SystemContractMetrics> = Lazy::new(SystemContractMetrics::new);

/// Collectors updated by [`BoundMethod`](super::BoundMethod) calls.
pub struct SystemContractMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,
    /// Wall-clock duration of every call, resolution included.
    pub call_duration_seconds: HistogramVec,
}

impl SystemContractMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        // 100 µs → ~3 s
        let call_duration_seconds = register_histogram_vec_with_registry!(
            HistogramOpts::new(CALL_DURATION_SECONDS, "System contract call duration in seconds")
                .buckets(prometheus::exponential_buckets(0.0001, 2.0, 15).expect("valid buckets")),
            &["method"],
            registry
        )
        .expect("failed to register call_duration_seconds histogram");

        Self { registry, call_duration_seconds }
    }

    /// Process-wide instance used by the call path.
    pub fn global() -> &'static Self {
        &METRICS
    }

    /// Starts timing a call to `method`. The duration is observed when the
    /// returned timer is dropped, on every exit path.
    pub(crate) fn start_call(&self, method: &str) -> HistogramTimer {
        self.call_duration_seconds.with_label_values(&[method]).start_timer()
    }
}

impl Default for SystemContractMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_observes_on_drop() {
        let metrics = SystemContractMetrics::new();
        {
            let _timer = metrics.start_call("getAddressFor");
        }
        drop(metrics.start_call("getAddressFor"));

        let histogram = metrics.call_duration_seconds.with_label_values(&["getAddressFor"]);
        assert_eq!(histogram.get_sample_count(), 2);
        assert_eq!(metrics.registry.gather()[0].get_name(), CALL_DURATION_SECONDS);
    }
}
