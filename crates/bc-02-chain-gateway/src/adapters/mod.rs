//! Adapters for the chain gateway ports.

pub mod ledger_client;
pub mod memory_cache;
pub mod memory_elections;
pub mod memory_registry;
pub mod timed_ledger;

pub use ledger_client::InProcessLedger;
pub use memory_cache::InMemoryCache;
pub use memory_elections::InMemoryElectionRepository;
pub use memory_registry::InMemoryRegistrationStore;
pub use timed_ledger::TimedLedgerClient;
