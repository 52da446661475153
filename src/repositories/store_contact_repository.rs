use crate::domain::ContactId;
use crate::error::DirectoryResult;
use crate::models::{Contact, ContactFields, ContactPatch};
use crate::repositories::traits::ContactRepository;
use crate::store::ContactStore;
use async_trait::async_trait;
use std::sync::Arc;

/// Contact repository over the in-process authoritative store.
///
/// Store calls hold the lock only for in-memory work, so they run inline.
#[derive(Clone)]
pub struct StoreContactRepository {
    store: Arc<ContactStore>,
}

impl StoreContactRepository {
    pub fn new(store: Arc<ContactStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ContactStore> {
        &self.store
    }
}

#[async_trait]
impl ContactRepository for StoreContactRepository {
    async fn list(&self) -> DirectoryResult<Vec<Contact>> {
        Ok(self.store.list())
    }

    async fn get(&self, id: &ContactId) -> DirectoryResult<Contact> {
        self.store.get(id)
    }

    async fn create(&self, fields: &ContactFields) -> DirectoryResult<Contact> {
        self.store.create(fields.clone())
    }

    async fn update(&self, id: &ContactId, patch: &ContactPatch) -> DirectoryResult<Contact> {
        self.store.update(id, patch)
    }

    async fn delete(&self, id: &ContactId) -> DirectoryResult<()> {
        self.store.delete(id)
    }
}
