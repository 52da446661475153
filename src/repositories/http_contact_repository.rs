use crate::client::AsyncContactsClient;
use crate::domain::ContactId;
use crate::error::DirectoryResult;
use crate::models::{Contact, ContactFields, ContactPatch};
use crate::repositories::traits::ContactRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Contact repository backed by a remote store over HTTP.
///
/// Uniqueness is the remote store's responsibility; a 409 surfaces as
/// `DirectoryError::Duplicate`.
pub struct HttpContactRepository {
    client: Arc<dyn AsyncContactsClient>,
}

impl HttpContactRepository {
    pub fn new(client: Arc<dyn AsyncContactsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContactRepository for HttpContactRepository {
    async fn list(&self) -> DirectoryResult<Vec<Contact>> {
        self.client.list_contacts().await
    }

    async fn get(&self, id: &ContactId) -> DirectoryResult<Contact> {
        self.client.get_contact(id).await
    }

    async fn create(&self, fields: &ContactFields) -> DirectoryResult<Contact> {
        self.client.create_contact(fields).await
    }

    async fn update(&self, id: &ContactId, patch: &ContactPatch) -> DirectoryResult<Contact> {
        self.client.update_contact(id, patch).await
    }

    async fn delete(&self, id: &ContactId) -> DirectoryResult<()> {
        self.client.delete_contact(id).await
    }
}
