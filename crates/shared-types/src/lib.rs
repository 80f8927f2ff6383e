//! # Shared Types Crate
//!
//! This crate contains the types that cross the ledger boundary: the
//! invocation envelope the gateway submits, the chaincode function names, and
//! the error classification every subsystem maps its errors onto.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: function names live here, not in string
//!   literals scattered across the gateway and the chaincode.
//! - **Stable classification**: each crate keeps its own `thiserror` enum but
//!   exposes `kind()` returning [`ErrorKind`], so callers branch on a closed set.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
