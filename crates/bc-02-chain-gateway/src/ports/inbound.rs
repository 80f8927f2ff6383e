//! # Inbound Ports (Driving Ports)
//!
//! - `GatewayApi`: the surface the HTTP layer calls
//! - `QueryExecutor`: read-path capability, direct or cached

use crate::domain::error::GatewayError;
use async_trait::async_trait;
use std::sync::Arc;

/// Gateway-facing surface.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Submit a transaction to the configured channel and contract.
    ///
    /// Returns `Transaction ID : {tx_id} Response: {payload}`.
    async fn invoke(&self, function: &str, args: &[String]) -> Result<String, GatewayError>;

    /// Evaluate a read-only function.
    async fn query(
        &self,
        channel: &str,
        contract: &str,
        function: &str,
        args: &[String],
    ) -> Result<String, GatewayError>;
}

/// Executes a read-only chaincode query.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(
        &self,
        channel: &str,
        contract: &str,
        function: &str,
        args: &[String],
    ) -> Result<String, GatewayError>;
}

#[async_trait]
impl<Q: QueryExecutor + ?Sized> QueryExecutor for Arc<Q> {
    async fn execute(
        &self,
        channel: &str,
        contract: &str,
        function: &str,
        args: &[String],
    ) -> Result<String, GatewayError> {
        (**self).execute(channel, contract, function, args).await
    }
}
