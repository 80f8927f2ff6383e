//! Read path: a [`QueryExecutor`](crate::ports::QueryExecutor) that goes
//! straight to the ledger, and a caching decorator over any executor.

pub mod cached;
pub mod direct;

pub use cached::{cache_key, CachedQueryExecutor};
pub use direct::LedgerQueryExecutor;
