//! # Ballot Telemetry
//!
//! Structured logging and Prometheus metrics for Ballot-Chain.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` fmt layer, plain or JSON, filtered by `EnvFilter`
//! - **Metrics**: Prometheus counters and histograms in one registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ballot_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let telemetry = init_telemetry(TelemetryConfig::for_component("gateway"))?;
//! // ...
//! let exposition = telemetry.metrics().gather()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BC_SERVICE_NAME` | `ballot-chain` | Service name in logs |
//! | `BC_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `BC_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `BC_JSON_LOGS` | `false` (`true` in containers) | JSON formatted logs |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, StructuredLogger};
pub use metrics::{
    register_metrics, HistogramTimer, MetricsHandle, CACHE_BACKEND_ERRORS, CACHE_HITS,
    CACHE_MISSES, GATEWAY_ERRORS, LEDGER_CALLS, LEDGER_CALL_DURATION, REGISTRATIONS,
    REGISTRATION_DIVERGENCES, REGISTRY,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
pub fn init_telemetry(config: TelemetryConfig) -> Result<Telemetry, TelemetryError> {
    let metrics = register_metrics()?;
    let logger = init_logging(&config)?;

    Ok(Telemetry {
        config,
        logger,
        metrics,
    })
}

/// Initialized telemetry: configuration, logger state and metrics handle.
pub struct Telemetry {
    config: TelemetryConfig,
    logger: StructuredLogger,
    metrics: MetricsHandle,
}

impl Telemetry {
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
