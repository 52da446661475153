use crate::domain::ContactId;
use crate::error::DirectoryResult;
use crate::models::{Contact, ContactFields, ContactPatch};
use async_trait::async_trait;

/// Persistence collaborator for contacts.
///
/// Implementations own the authoritative record set: they assign ids, enforce
/// email/phone uniqueness atomically with each write, and answer point and
/// list queries. The in-process store and the REST client both implement it.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// All active contacts in creation order.
    async fn list(&self) -> DirectoryResult<Vec<Contact>>;

    /// Retrieve a single contact by ID.
    async fn get(&self, id: &ContactId) -> DirectoryResult<Contact>;

    /// Create a new contact.
    async fn create(&self, fields: &ContactFields) -> DirectoryResult<Contact>;

    /// Merge a partial update onto an existing contact.
    async fn update(&self, id: &ContactId, patch: &ContactPatch) -> DirectoryResult<Contact>;

    /// Delete a contact.
    async fn delete(&self, id: &ContactId) -> DirectoryResult<()>;
}
