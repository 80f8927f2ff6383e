//! # Registration Proxy
//!
//! Intercepts `RegisterVoter` and keeps the local registration store in step
//! with the ledger. Every other function is forwarded untouched.
//!
//! ## Intercepted Flow
//!
//! ```text
//! validate args ──▶ lock(idnp) ──▶ find ──▶ insert ──▶ ledger.submit ──▶ [mark_registered]
//!                                    │
//!                                    ├─ registered ──▶ AlreadyRegistered (no ledger call)
//!                                    └─ submitted ───▶ retry mark_registered (no ledger call)
//! ```
//!
//! ## Dual-Write Window
//!
//! The local insert and the ledger write are not atomic. Under
//! [`RegistrationMode::Eager`] a ledger failure leaves a local record marked
//! registered that the ledger never saw; it is logged and counted, not rolled
//! back. Under [`RegistrationMode::Saga`] the record is flagged `submitted`
//! before the ledger call and marked registered once the ledger accepts.
//!
//! `RegisterVoter` overwrites the voter on the ledger and clears `hasVoted`,
//! so it is forwarded again only after a definite rejection. When the ledger
//! accepted but the local mark failed, a retry repeats the mark alone. When
//! the outcome is unknown (timeout, unreachable peer) the record stays
//! submitted and retries fail with [`GatewayError::RegistrationUnconfirmed`].

use crate::domain::config::RegistrationConfig;
use crate::domain::error::{GatewayError, LocalStoreError};
use crate::domain::registration::{NewRegistration, RegistrationMode};
use crate::ports::outbound::{LedgerClient, RegistrationStore};
use ballot_telemetry::{log_event, metric_inc, REGISTRATIONS, REGISTRATION_DIVERGENCES};
use dashmap::DashMap;
use shared_types::{functions, Invocation, TransactionReceipt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

const COMPONENT: &str = "proxy";

type KeyLocks = DashMap<String, Arc<Mutex<()>>>;

pub struct RegistrationProxy {
    store: Arc<dyn RegistrationStore>,
    ledger: Arc<dyn LedgerClient>,
    mode: RegistrationMode,
    role: String,
    locks: KeyLocks,
    /// Receipts the ledger issued for records whose local mark failed.
    accepted: DashMap<String, TransactionReceipt>,
}

impl RegistrationProxy {
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        ledger: Arc<dyn LedgerClient>,
        config: &RegistrationConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            mode: config.mode,
            role: config.role.clone(),
            locks: DashMap::new(),
            accepted: DashMap::new(),
        }
    }

    pub fn mode(&self) -> RegistrationMode {
        self.mode
    }

    /// Submit `invocation`, intercepting voter registration.
    pub async fn submit(&self, invocation: &Invocation) -> Result<TransactionReceipt, GatewayError> {
        if invocation.function != functions::REGISTER_VOTER {
            return Ok(self.ledger.submit(invocation).await?);
        }

        let registration = match NewRegistration::validate(&invocation.args, &self.role, self.mode)
        {
            Ok(registration) => registration,
            Err(e) => {
                metric_inc!(REGISTRATIONS, &["rejected"]);
                return Err(e);
            }
        };

        let key_lock = KeyLock::new(&self.locks, &registration.external_id);
        let _guard = key_lock.lock.lock().await;
        self.register(registration, invocation).await
    }

    #[instrument(skip_all, fields(external_id = %registration.external_id, mode = %self.mode))]
    async fn register(
        &self,
        registration: NewRegistration,
        invocation: &Invocation,
    ) -> Result<TransactionReceipt, GatewayError> {
        let external_id = registration.external_id.clone();

        let resumed = match self.store.find_by_external_id(&external_id).await? {
            Some(record) if record.registered => {
                metric_inc!(REGISTRATIONS, &["rejected"]);
                return Err(GatewayError::AlreadyRegistered(external_id));
            }
            Some(record) if record.submitted => return self.complete(&external_id).await,
            Some(_) => {
                log_event!(info, COMPONENT, "Resuming pending registration");
                true
            }
            None => {
                match self.store.insert(registration).await {
                    Ok(_) => {}
                    Err(LocalStoreError::Duplicate(id)) => {
                        metric_inc!(REGISTRATIONS, &["rejected"]);
                        return Err(GatewayError::AlreadyRegistered(id));
                    }
                    Err(e) => return Err(e.into()),
                }
                false
            }
        };

        let registered_locally = !resumed && self.mode.registered_on_insert();
        if !registered_locally {
            self.store.set_submitted(&external_id, true).await?;
        }

        match self.ledger.submit(invocation).await {
            Ok(receipt) => {
                if !registered_locally {
                    if let Err(e) = self.store.mark_registered(&external_id).await {
                        error!(
                            tx_id = %receipt.transaction_id,
                            error = %e,
                            "Ledger accepted registration but local record is still pending"
                        );
                        self.accepted.insert(external_id, receipt);
                        metric_inc!(REGISTRATIONS, &["failed"]);
                        return Err(e.into());
                    }
                }
                metric_inc!(REGISTRATIONS, &["accepted"]);
                info!(tx_id = %receipt.transaction_id, resumed, "Voter registered");
                Ok(receipt)
            }
            Err(e) => {
                metric_inc!(REGISTRATIONS, &["failed"]);
                if registered_locally {
                    metric_inc!(REGISTRATION_DIVERGENCES);
                    log_event!(
                        warn,
                        COMPONENT,
                        "Voter recorded locally but ledger registration failed",
                        external_id = %external_id,
                        error = %e
                    );
                } else if e.is_indeterminate() {
                    log_event!(
                        warn,
                        COMPONENT,
                        "Ledger outcome unknown, registration held for confirmation",
                        external_id = %external_id,
                        error = %e
                    );
                } else if let Err(store_error) = self.store.set_submitted(&external_id, false).await
                {
                    error!(
                        error = %e,
                        store_error = %store_error,
                        "Ledger rejected registration and the record could not be reopened"
                    );
                } else {
                    warn!(error = %e, "Ledger rejected registration, local record left pending");
                }
                Err(e.into())
            }
        }
    }

    /// Finish a registration whose ledger call already happened. Only the
    /// local mark is retried.
    async fn complete(&self, external_id: &str) -> Result<TransactionReceipt, GatewayError> {
        let Some(receipt) = self
            .accepted
            .get(external_id)
            .map(|entry| entry.value().clone())
        else {
            metric_inc!(REGISTRATIONS, &["rejected"]);
            log_event!(
                warn,
                COMPONENT,
                "Registration awaits ledger confirmation",
                external_id = %external_id
            );
            return Err(GatewayError::RegistrationUnconfirmed(external_id.to_string()));
        };

        if let Err(e) = self.store.mark_registered(external_id).await {
            metric_inc!(REGISTRATIONS, &["failed"]);
            warn!(error = %e, "Local record is still pending");
            return Err(e.into());
        }
        self.accepted.remove(external_id);

        metric_inc!(REGISTRATIONS, &["accepted"]);
        info!(tx_id = %receipt.transaction_id, "Voter registration completed locally");
        Ok(receipt)
    }
}

/// Handle on the per-id mutex. Dropping it removes the map entry once no
/// other caller holds the same mutex, whether or not the owner completed.
struct KeyLock<'a> {
    locks: &'a KeyLocks,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl<'a> KeyLock<'a> {
    fn new(locks: &'a KeyLocks, key: &str) -> Self {
        let lock = locks.entry(key.to_string()).or_default().clone();
        Self {
            locks,
            key: key.to_string(),
            lock,
        }
    }
}

impl Drop for KeyLock<'_> {
    fn drop(&mut self) {
        // Release our handle first so the last caller sees a count of one
        drop(std::mem::take(&mut self.lock));
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
