//! # Ballot-Chain Test Suite
//!
//! Cross-crate flows that exercise the voting chaincode through the gateway.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── voting_flows.rs    # Chaincode behind the in-process ledger
//!     └── gateway_flows.rs   # Cache, registration proxy, catalog, config
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bc-tests
//! cargo test -p bc-tests integration::gateway_flows::
//! ```

pub mod integration;
