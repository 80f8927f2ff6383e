//! # Transaction Gateway
//!
//! Binds the registration proxy (write path) and a query executor (read
//! path) to one configured channel and contract.

use crate::adapters::{
    InMemoryCache, InMemoryElectionRepository, InMemoryRegistrationStore, InProcessLedger,
    TimedLedgerClient,
};
use crate::catalog::ElectionCatalog;
use crate::domain::config::{ConfigError, GatewayConfig};
use crate::domain::error::GatewayError;
use crate::ports::inbound::{GatewayApi, QueryExecutor};
use crate::ports::outbound::LedgerClient;
use crate::proxy::RegistrationProxy;
use crate::query::{CachedQueryExecutor, LedgerQueryExecutor};
use async_trait::async_trait;
use ballot_telemetry::{metric_inc, GATEWAY_ERRORS};
use bc_01_voting_ledger::{InMemoryStateStore, VotingContract};
use shared_types::{Classify, Invocation};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct TransactionGateway {
    channel: String,
    contract: String,
    proxy: RegistrationProxy,
    queries: Arc<dyn QueryExecutor>,
}

impl TransactionGateway {
    pub fn new(
        config: &GatewayConfig,
        proxy: RegistrationProxy,
        queries: Arc<dyn QueryExecutor>,
    ) -> Self {
        Self {
            channel: config.ledger.channel.clone(),
            contract: config.ledger.contract.clone(),
            proxy,
            queries,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }
}

fn record_error(error: &GatewayError) {
    metric_inc!(GATEWAY_ERRORS, &[error.kind().as_str()]);
    debug!(kind = %error.kind(), error = %error, "Gateway call failed");
}

#[async_trait]
impl GatewayApi for TransactionGateway {
    #[instrument(skip(self, args), fields(channel = %self.channel, contract = %self.contract))]
    async fn invoke(&self, function: &str, args: &[String]) -> Result<String, GatewayError> {
        let invocation = Invocation::new(&self.channel, &self.contract, function, args.to_vec());
        let receipt = self
            .proxy
            .submit(&invocation)
            .await
            .inspect_err(record_error)?;
        Ok(receipt.to_string())
    }

    #[instrument(skip(self, args))]
    async fn query(
        &self,
        channel: &str,
        contract: &str,
        function: &str,
        args: &[String],
    ) -> Result<String, GatewayError> {
        self.queries
            .execute(channel, contract, function, args)
            .await
            .inspect_err(record_error)
    }
}

/// A gateway wired to in-memory adapters, with handles to every store.
pub struct InMemoryDeployment {
    pub gateway: TransactionGateway,
    pub catalog: ElectionCatalog,
    pub contract: Arc<VotingContract<InMemoryStateStore>>,
    pub world_state: Arc<InMemoryStateStore>,
    pub ledger: Arc<InProcessLedger>,
    pub registrations: Arc<InMemoryRegistrationStore>,
    pub cache: Arc<InMemoryCache>,
}

impl InMemoryDeployment {
    /// Validate `config` and wire every component in-process.
    pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let world_state = Arc::new(InMemoryStateStore::new());
        let contract = Arc::new(VotingContract::new(
            world_state.clone(),
            config.contract_config(),
        ));

        let ledger = Arc::new(InProcessLedger::new());
        ledger.deploy(config.ledger.channel.clone(), contract.clone());
        let client: Arc<dyn LedgerClient> = Arc::new(TimedLedgerClient::from_config(
            ledger.clone(),
            &config.ledger,
        ));

        let registrations = Arc::new(InMemoryRegistrationStore::new());
        let proxy = RegistrationProxy::new(registrations.clone(), client.clone(), &config.registration);

        let cache = Arc::new(InMemoryCache::new());
        let direct = LedgerQueryExecutor::new(client);
        let queries: Arc<dyn QueryExecutor> = if config.cache.enabled {
            Arc::new(CachedQueryExecutor::from_config(
                direct,
                cache.clone(),
                &config.cache,
            ))
        } else {
            Arc::new(direct)
        };

        info!(
            channel = %config.ledger.channel,
            contract = %config.ledger.contract,
            cache_enabled = config.cache.enabled,
            registration_mode = %config.registration.mode,
            "In-memory gateway wired"
        );

        Ok(Self {
            gateway: TransactionGateway::new(config, proxy, queries),
            catalog: ElectionCatalog::new(Arc::new(InMemoryElectionRepository::new())),
            contract,
            world_state,
            ledger,
            registrations,
            cache,
        })
    }
}
