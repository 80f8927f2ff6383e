//! Direct query execution against the ledger client.

use crate::domain::error::GatewayError;
use crate::ports::inbound::QueryExecutor;
use crate::ports::outbound::LedgerClient;
use async_trait::async_trait;
use shared_types::Invocation;
use std::sync::Arc;
use tracing::debug;

/// Evaluates every query on the ledger.
#[derive(Clone)]
pub struct LedgerQueryExecutor {
    ledger: Arc<dyn LedgerClient>,
}

impl LedgerQueryExecutor {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl QueryExecutor for LedgerQueryExecutor {
    async fn execute(
        &self,
        channel: &str,
        contract: &str,
        function: &str,
        args: &[String],
    ) -> Result<String, GatewayError> {
        let invocation = Invocation::new(channel, contract, function, args.to_vec());
        debug!(invocation = %invocation, "Evaluating query");
        Ok(self.ledger.evaluate(&invocation).await?)
    }
}
