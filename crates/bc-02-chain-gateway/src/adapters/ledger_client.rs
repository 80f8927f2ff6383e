//! In-process ledger client.
//!
//! Routes `(channel, contract)` to a deployed [`Chaincode`] and executes the
//! invocation directly. Each submission gets a UUID v4 transaction id.

use crate::domain::error::LedgerError;
use crate::ports::outbound::LedgerClient;
use async_trait::async_trait;
use ballot_telemetry::log_tx_event;
use bc_01_voting_ledger::Chaincode;
use parking_lot::RwLock;
use shared_types::{functions, is_read_only, Invocation, TransactionReceipt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

type Route = (String, String);

/// Ledger client that executes chaincode in the calling task.
#[derive(Default)]
pub struct InProcessLedger {
    contracts: RwLock<HashMap<Route, Arc<dyn Chaincode>>>,
    submissions: AtomicU64,
    evaluations: AtomicU64,
}

impl InProcessLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `chaincode` on `channel` under its own name. Replaces any
    /// contract previously deployed there.
    pub fn deploy(&self, channel: impl Into<String>, chaincode: Arc<dyn Chaincode>) {
        let channel = channel.into();
        let contract = chaincode.name().to_string();
        debug!(%channel, %contract, "Chaincode deployed");
        self.contracts.write().insert((channel, contract), chaincode);
    }

    /// Number of `submit` calls received, successful or not.
    pub fn submissions(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    /// Number of `evaluate` calls received, successful or not.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    fn route(&self, invocation: &Invocation) -> Result<Arc<dyn Chaincode>, LedgerError> {
        self.contracts
            .read()
            .get(&(invocation.channel.clone(), invocation.contract.clone()))
            .cloned()
            .ok_or_else(|| LedgerError::UnknownContract {
                channel: invocation.channel.clone(),
                contract: invocation.contract.clone(),
            })
    }
}

#[async_trait]
impl LedgerClient for InProcessLedger {
    async fn submit(&self, invocation: &Invocation) -> Result<TransactionReceipt, LedgerError> {
        self.submissions.fetch_add(1, Ordering::Relaxed);
        let chaincode = self.route(invocation)?;

        let transaction_id = Uuid::new_v4().to_string();
        let payload = chaincode.invoke(&invocation.function, &invocation.args)?;

        log_tx_event!(
            debug,
            "ledger",
            "Transaction committed",
            transaction_id,
            function = %invocation.function
        );
        Ok(TransactionReceipt {
            transaction_id,
            payload,
        })
    }

    async fn evaluate(&self, invocation: &Invocation) -> Result<String, LedgerError> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        if functions::ALL.contains(&invocation.function.as_str())
            && !is_read_only(&invocation.function)
        {
            return Err(LedgerError::NotReadOnly(invocation.function.clone()));
        }

        let chaincode = self.route(invocation)?;
        Ok(chaincode.invoke(&invocation.function, &invocation.args)?)
    }
}
