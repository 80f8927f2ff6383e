//! Prometheus metrics for Ballot-Chain components.
//!
//! All metrics follow the naming convention: `bc_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: cache lookups, ledger calls, registrations
//! - **Histogram**: ledger call latency

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // QUERY CACHE METRICS
    // =========================================================================

    /// Queries answered from the cache
    pub static ref CACHE_HITS: IntCounter = IntCounter::new(
        "bc_cache_hits_total",
        "Queries answered from the cache"
    ).expect("metric creation failed");

    /// Queries that went to the inner executor
    pub static ref CACHE_MISSES: IntCounter = IntCounter::new(
        "bc_cache_misses_total",
        "Queries that were not answered from the cache"
    ).expect("metric creation failed");

    /// Cache backend failures and timeouts, treated as misses
    pub static ref CACHE_BACKEND_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("bc_cache_backend_errors_total", "Cache backend failures by operation"),
        &["operation"]  // operation: get/set
    ).expect("metric creation failed");

    // =========================================================================
    // LEDGER METRICS
    // =========================================================================

    /// Ledger submissions and evaluations by outcome
    pub static ref LEDGER_CALLS: IntCounterVec = IntCounterVec::new(
        Opts::new("bc_ledger_calls_total", "Ledger calls by kind and outcome"),
        &["kind", "outcome"]  // kind: submit/evaluate, outcome: ok/error/timeout
    ).expect("metric creation failed");

    /// Ledger call latency
    pub static ref LEDGER_CALL_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "bc_ledger_call_duration_seconds",
            "Time spent in ledger submit/evaluate calls"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).expect("valid bucket layout")),
        &["kind"]
    ).expect("metric creation failed");

    // =========================================================================
    // REGISTRATION METRICS
    // =========================================================================

    /// Intercepted voter registrations by outcome
    pub static ref REGISTRATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("bc_registrations_total", "Voter registrations by outcome"),
        &["outcome"]  // outcome: accepted/rejected/failed
    ).expect("metric creation failed");

    /// Local record written but ledger call failed
    pub static ref REGISTRATION_DIVERGENCES: IntCounter = IntCounter::new(
        "bc_registration_divergences_total",
        "Registrations recorded locally that the ledger rejected"
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Gateway errors returned to callers, by kind
    pub static ref GATEWAY_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("bc_gateway_errors_total", "Errors returned by the gateway, by kind"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Handle over the registry that [`register_metrics`] populated.
#[derive(Clone)]
pub struct MetricsHandle {
    registry: Registry,
}

impl MetricsHandle {
    /// Encode all metrics in Prometheus text exposition format.
    pub fn gather(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
    }
}

/// Register all metrics with the global registry.
///
/// Idempotent: collectors that are already registered are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Cache
        Box::new(CACHE_HITS.clone()),
        Box::new(CACHE_MISSES.clone()),
        Box::new(CACHE_BACKEND_ERRORS.clone()),
        // Ledger
        Box::new(LEDGER_CALLS.clone()),
        Box::new(LEDGER_CALL_DURATION.clone()),
        // Registration
        Box::new(REGISTRATIONS.clone()),
        Box::new(REGISTRATION_DIVERGENCES.clone()),
        // Errors
        Box::new(GATEWAY_ERRORS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: REGISTRY.clone(),
    })
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a labelled histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
    ($histogram:expr, $labels:expr) => {
        $crate::HistogramTimer::new(&$histogram.with_label_values($labels))
    };
}
