//! Deadline and metrics decorator for any [`LedgerClient`].
//!
//! An elapsed deadline becomes [`LedgerError::Timeout`]. Nothing is retried.

use crate::domain::config::LedgerConfig;
use crate::domain::error::LedgerError;
use crate::ports::outbound::LedgerClient;
use async_trait::async_trait;
use ballot_telemetry::{metric_inc, time_histogram, LEDGER_CALLS, LEDGER_CALL_DURATION};
use shared_types::{Invocation, TransactionReceipt};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

pub struct TimedLedgerClient<L> {
    inner: L,
    submit_timeout: Duration,
    evaluate_timeout: Duration,
}

impl<L: LedgerClient> TimedLedgerClient<L> {
    pub fn new(inner: L, submit_timeout: Duration, evaluate_timeout: Duration) -> Self {
        Self {
            inner,
            submit_timeout,
            evaluate_timeout,
        }
    }

    pub fn from_config(inner: L, config: &LedgerConfig) -> Self {
        Self::new(inner, config.submit_timeout, config.evaluate_timeout)
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

async fn timed<T, F>(
    operation: &'static str,
    deadline: Duration,
    invocation: &Invocation,
    call: F,
) -> Result<T, LedgerError>
where
    F: Future<Output = Result<T, LedgerError>>,
{
    let _timer = time_histogram!(LEDGER_CALL_DURATION, &[operation]);
    let result = match timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                invocation = %invocation,
                timeout_ms = deadline.as_millis() as u64,
                "Ledger call timed out"
            );
            Err(LedgerError::Timeout {
                operation,
                after: deadline,
            })
        }
    };

    let outcome = match &result {
        Ok(_) => "ok",
        Err(LedgerError::Timeout { .. }) => "timeout",
        Err(_) => "error",
    };
    metric_inc!(LEDGER_CALLS, &[operation, outcome]);
    result
}

#[async_trait]
impl<L: LedgerClient> LedgerClient for TimedLedgerClient<L> {
    async fn submit(&self, invocation: &Invocation) -> Result<TransactionReceipt, LedgerError> {
        timed(
            "submit",
            self.submit_timeout,
            invocation,
            self.inner.submit(invocation),
        )
        .await
    }

    async fn evaluate(&self, invocation: &Invocation) -> Result<String, LedgerError> {
        timed(
            "evaluate",
            self.evaluate_timeout,
            invocation,
            self.inner.evaluate(invocation),
        )
        .await
    }
}
