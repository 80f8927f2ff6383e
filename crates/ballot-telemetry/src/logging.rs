//! Structured logging.
//!
//! Logs go through `tracing` with consistent fields:
//! - `component`: component name (ledger, gateway, proxy, cache)
//! - `tx_id`: ledger transaction id where one exists
//! - additional context fields
//!
//! JSON output is selected by [`TelemetryConfig::json_logs`].

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Structured logger handle
#[derive(Debug)]
pub struct StructuredLogger {
    installed: bool,
}

impl StructuredLogger {
    /// Whether this call installed the global subscriber. `false` when
    /// console output is disabled or another subscriber was already set.
    pub fn installed(&self) -> bool {
        self.installed
    }
}

/// Install the global `tracing` subscriber.
///
/// Safe to call more than once: only the first call installs anything.
pub fn init_logging(config: &TelemetryConfig) -> Result<StructuredLogger, TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level {:?}: {e}", config.log_level)))?;

    if !config.console_output {
        return Ok(StructuredLogger { installed: false });
    }

    let result = if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    };

    let installed = result.is_ok();
    if installed {
        tracing::info!(
            service = %config.full_service_name(),
            json_logs = config.json_logs,
            "Logging initialized"
        );
    }

    Ok(StructuredLogger { installed })
}

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a ledger transaction event with standard fields.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $component:expr, $msg:expr, $tx_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            tx_id = %$tx_id,
            $($($field)*,)?
            $msg
        )
    };
}
