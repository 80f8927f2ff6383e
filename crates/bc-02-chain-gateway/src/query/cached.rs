//! Caching decorator for query executors.
//!
//! ## Read Consistency
//!
//! Entries live for a fixed TTL and are never invalidated by writes, so a
//! query issued after a successful `CastVote` may return the pre-vote value
//! until the entry expires.
//!
//! ## Failure Handling
//!
//! The cache is best-effort. A backend error or timeout on `get` counts as a
//! miss; on `set` it is logged and dropped. Inner-executor errors are returned
//! to the caller and never cached.

use crate::domain::config::CacheConfig;
use crate::domain::error::{CacheError, GatewayError};
use crate::ports::inbound::QueryExecutor;
use crate::ports::outbound::CacheBackend;
use async_trait::async_trait;
use ballot_telemetry::{metric_inc, CACHE_BACKEND_ERRORS, CACHE_HITS, CACHE_MISSES};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Prefix of every query cache key.
pub const KEY_PREFIX: &str = "query:";

/// Cache key for a query: the prefix followed by the JSON array
/// `[channel, contract, function, [args...]]`.
pub fn cache_key(
    channel: &str,
    contract: &str,
    function: &str,
    args: &[String],
) -> Result<String, serde_json::Error> {
    let tuple = serde_json::to_string(&(channel, contract, function, args))?;
    Ok(format!("{KEY_PREFIX}{tuple}"))
}

/// Wraps a [`QueryExecutor`] with a TTL cache.
pub struct CachedQueryExecutor<Q, C> {
    inner: Q,
    cache: C,
    ttl: Duration,
    operation_timeout: Duration,
}

impl<Q: QueryExecutor, C: CacheBackend> CachedQueryExecutor<Q, C> {
    pub fn new(inner: Q, cache: C, ttl: Duration, operation_timeout: Duration) -> Self {
        Self {
            inner,
            cache,
            ttl,
            operation_timeout,
        }
    }

    pub fn from_config(inner: Q, cache: C, config: &CacheConfig) -> Self {
        Self::new(inner, cache, config.ttl, config.operation_timeout)
    }

    pub fn inner(&self) -> &Q {
        &self.inner
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    async fn lookup(&self, key: &str) -> Option<String> {
        let result = match timeout(self.operation_timeout, self.cache.get(key)).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout {
                operation: "get",
                after: self.operation_timeout,
            }),
        };

        match result {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Cache lookup failed, treating as miss");
                metric_inc!(CACHE_BACKEND_ERRORS, &["get"]);
                None
            }
        }
    }

    async fn store(&self, key: &str, value: String) {
        let result = match timeout(self.operation_timeout, self.cache.set(key, value, self.ttl)).await
        {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout {
                operation: "set",
                after: self.operation_timeout,
            }),
        };

        if let Err(e) = result {
            warn!(key, error = %e, "Failed to cache query result");
            metric_inc!(CACHE_BACKEND_ERRORS, &["set"]);
        }
    }
}

#[async_trait]
impl<Q: QueryExecutor, C: CacheBackend> QueryExecutor for CachedQueryExecutor<Q, C> {
    async fn execute(
        &self,
        channel: &str,
        contract: &str,
        function: &str,
        args: &[String],
    ) -> Result<String, GatewayError> {
        let key = match cache_key(channel, contract, function, args) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(function, error = %e, "Cannot build cache key, bypassing cache");
                None
            }
        };

        if let Some(key) = &key {
            if let Some(cached) = self.lookup(key).await {
                metric_inc!(CACHE_HITS);
                debug!(key = %key, "Cache hit");
                return Ok(cached);
            }
        }

        metric_inc!(CACHE_MISSES);
        let value = self.inner.execute(channel, contract, function, args).await?;

        if let Some(key) = &key {
            self.store(key, value.clone()).await;
        }
        Ok(value)
    }
}
