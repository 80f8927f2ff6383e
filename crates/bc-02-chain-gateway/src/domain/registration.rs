//! Local registration records kept beside the ledger.

use crate::domain::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role stamped on records created by voter registration.
pub const DEFAULT_ROLE: &str = "user";

/// How the proxy orders the local insert and the ledger call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationMode {
    /// Insert with `registered = true`, then forward. A ledger failure leaves
    /// the local record behind.
    #[default]
    Eager,
    /// Insert pending (`registered = false`), forward, then mark registered.
    /// A retry re-forwards only records the ledger is known not to hold.
    Saga,
}

impl RegistrationMode {
    /// `registered` flag of a freshly inserted record.
    pub fn registered_on_insert(self) -> bool {
        matches!(self, RegistrationMode::Eager)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationMode::Eager => "eager",
            RegistrationMode::Saga => "saga",
        }
    }
}

impl fmt::Display for RegistrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(RegistrationMode::Eager),
            "saga" => Ok(RegistrationMode::Saga),
            other => Err(format!("unknown registration mode: {other}")),
        }
    }
}

/// A stored registration. `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub id: u64,
    #[serde(rename = "externalId")]
    pub external_id: String,
    pub name: String,
    pub role: String,
    pub registered: bool,
    /// Set while a ledger call for this record is in flight or its outcome
    /// is unknown. Such a record is never forwarded again.
    #[serde(default)]
    pub submitted: bool,
}

/// A validated registration that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub external_id: String,
    pub name: String,
    pub role: String,
    pub registered: bool,
}

impl NewRegistration {
    /// Build a registration from `RegisterVoter` arguments `[idnp, name]`.
    pub fn validate(
        args: &[String],
        role: &str,
        mode: RegistrationMode,
    ) -> Result<Self, GatewayError> {
        let external_id = match args.first() {
            Some(id) if !id.is_empty() => id.clone(),
            _ => return Err(GatewayError::validation("voter IDNP cannot be empty")),
        };
        shared_types::expect_args(args, 2)
            .map_err(|e| GatewayError::validation(e.to_string()))?;
        let name = args[1].clone();

        Ok(Self {
            external_id,
            name,
            role: role.to_string(),
            registered: mode.registered_on_insert(),
        })
    }

    pub fn into_record(self, id: u64) -> RegistrationRecord {
        RegistrationRecord {
            id,
            external_id: self.external_id,
            name: self.name,
            role: self.role,
            registered: self.registered,
            submitted: false,
        }
    }
}
