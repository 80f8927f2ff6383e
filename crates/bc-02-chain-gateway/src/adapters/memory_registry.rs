//! In-memory registration store with a unique external id and
//! auto-incrementing record ids.

use crate::domain::error::LocalStoreError;
use crate::domain::registration::{NewRegistration, RegistrationRecord};
use crate::ports::outbound::RegistrationStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    by_external_id: HashMap<String, RegistrationRecord>,
    last_id: u64,
}

#[derive(Default)]
pub struct InMemoryRegistrationStore {
    inner: Mutex<Inner>,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().by_external_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<RegistrationRecord>, LocalStoreError> {
        Ok(self.inner.lock().by_external_id.get(external_id).cloned())
    }

    async fn insert(
        &self,
        registration: NewRegistration,
    ) -> Result<RegistrationRecord, LocalStoreError> {
        let mut inner = self.inner.lock();
        if inner.by_external_id.contains_key(&registration.external_id) {
            return Err(LocalStoreError::Duplicate(registration.external_id));
        }

        inner.last_id += 1;
        let record = registration.into_record(inner.last_id);
        inner
            .by_external_id
            .insert(record.external_id.clone(), record.clone());
        Ok(record)
    }

    async fn mark_registered(&self, external_id: &str) -> Result<(), LocalStoreError> {
        let mut inner = self.inner.lock();
        let record = inner
            .by_external_id
            .get_mut(external_id)
            .ok_or_else(|| LocalStoreError::NotFound(external_id.to_string()))?;
        record.registered = true;
        Ok(())
    }

    async fn set_submitted(
        &self,
        external_id: &str,
        submitted: bool,
    ) -> Result<(), LocalStoreError> {
        let mut inner = self.inner.lock();
        let record = inner
            .by_external_id
            .get_mut(external_id)
            .ok_or_else(|| LocalStoreError::NotFound(external_id.to_string()))?;
        record.submitted = submitted;
        Ok(())
    }
}
