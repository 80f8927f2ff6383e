//! Ports for the chain gateway.

pub mod inbound;
pub mod outbound;

pub use inbound::{GatewayApi, QueryExecutor};
pub use outbound::{CacheBackend, ElectionRepository, LedgerClient, RegistrationStore};
