//! Async wrapper around the synchronous ContactsClient.
//!
//! Each call runs on tokio's blocking pool via `spawn_blocking`, so slow HTTP
//! round-trips never stall the async runtime.

use crate::client::ContactsClient;
use crate::domain::ContactId;
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{Contact, ContactFields, ContactPatch};
use async_trait::async_trait;
use std::sync::Arc;

/// Async interface to the contact store REST surface.
#[async_trait]
pub trait AsyncContactsClient: Send + Sync {
    async fn list_contacts(&self) -> DirectoryResult<Vec<Contact>>;
    async fn get_contact(&self, id: &ContactId) -> DirectoryResult<Contact>;
    async fn create_contact(&self, fields: &ContactFields) -> DirectoryResult<Contact>;
    async fn update_contact(&self, id: &ContactId, patch: &ContactPatch)
        -> DirectoryResult<Contact>;
    async fn delete_contact(&self, id: &ContactId) -> DirectoryResult<()>;
}

#[derive(Clone)]
pub struct AsyncContactsClientImpl {
    client: Arc<ContactsClient>,
}

impl AsyncContactsClientImpl {
    pub fn new(client: ContactsClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> DirectoryError {
    DirectoryError::Transport(format!("Task join error: {}", e))
}

#[async_trait]
impl AsyncContactsClient for AsyncContactsClientImpl {
    async fn list_contacts(&self) -> DirectoryResult<Vec<Contact>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.list_contacts())
            .await
            .map_err(join_error)?
    }

    async fn get_contact(&self, id: &ContactId) -> DirectoryResult<Contact> {
        let client = self.client.clone();
        let id = id.clone();

        tokio::task::spawn_blocking(move || client.get_contact(&id))
            .await
            .map_err(join_error)?
    }

    async fn create_contact(&self, fields: &ContactFields) -> DirectoryResult<Contact> {
        let client = self.client.clone();
        let fields = fields.clone();

        tokio::task::spawn_blocking(move || client.create_contact(&fields))
            .await
            .map_err(join_error)?
    }

    async fn update_contact(
        &self,
        id: &ContactId,
        patch: &ContactPatch,
    ) -> DirectoryResult<Contact> {
        let client = self.client.clone();
        let id = id.clone();
        let patch = patch.clone();

        tokio::task::spawn_blocking(move || client.update_contact(&id, &patch))
            .await
            .map_err(join_error)?
    }

    async fn delete_contact(&self, id: &ContactId) -> DirectoryResult<()> {
        let client = self.client.clone();
        let id = id.clone();

        tokio::task::spawn_blocking(move || client.delete_contact(&id))
            .await
            .map_err(join_error)?
    }
}
