//! Domain layer for the chain gateway.

pub mod config;
pub mod election;
pub mod error;
pub mod registration;

pub use config::{CacheConfig, ConfigError, GatewayConfig, LedgerConfig, RegistrationConfig};
pub use election::{CandidateProfile, Election, NewElection};
pub use error::{CacheError, GatewayError, LedgerError, LocalStoreError};
pub use registration::{NewRegistration, RegistrationMode, RegistrationRecord, DEFAULT_ROLE};
