//! Client-side cache of the contact list, reconciled against confirmed results.
//!
//! The cache only changes after the repository confirms a mutation. Failed
//! calls leave it untouched, except `NotFound`, which evicts the id.

use crate::domain::ContactId;
use crate::error::{DirectoryError, DirectoryResult, DuplicateField};
use crate::models::{Contact, ContactFields, ContactPatch};
use crate::repositories::ContactRepository;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
struct CacheState {
    /// Last-known list in creation order
    contacts: Vec<Contact>,

    next_ticket: u64,

    /// Ticket of the newest update applied per id
    applied: HashMap<ContactId, u64>,

    /// Ids confirmed deleted during this session
    gone: HashSet<ContactId>,
}

impl CacheState {
    fn position(&self, id: &ContactId) -> Option<usize> {
        self.contacts.iter().position(|c| &c.id == id)
    }

    fn remove(&mut self, id: &ContactId) -> bool {
        self.applied.remove(id);
        self.gone.insert(id.clone());
        match self.position(id) {
            Some(index) => {
                self.contacts.remove(index);
                true
            }
            None => false,
        }
    }

    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }
}

fn log_failure(operation: &str, err: &DirectoryError) {
    match err {
        DirectoryError::Transport(_) => error!(operation, error = %err, "Contact store unreachable"),
        _ => debug!(operation, error = %err, "Contact store rejected request"),
    }
}

/// Last-known contact list for one session.
///
/// The lock is never held across a repository call.
pub struct ClientSyncState {
    repo: Arc<dyn ContactRepository>,
    cache: Mutex<CacheState>,
}

impl ClientSyncState {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self {
            repo,
            cache: Mutex::new(CacheState::default()),
        }
    }

    pub fn repository(&self) -> &dyn ContactRepository {
        self.repo.as_ref()
    }

    /// Replace the cache with the store's full list.
    ///
    /// On failure the previous cache is kept.
    pub async fn fetch_all(&self) -> DirectoryResult<usize> {
        let contacts = self.repo.list().await.inspect_err(|e| log_failure("list", e))?;
        let count = contacts.len();

        let mut cache = self.cache.lock();
        cache.contacts = contacts;
        cache.applied.clear();

        debug!(count, "Contact cache refreshed");
        Ok(count)
    }

    /// Copy of the cached list in creation order.
    pub fn snapshot(&self) -> Vec<Contact> {
        self.cache.lock().contacts.clone()
    }

    pub fn contains(&self, id: &ContactId) -> bool {
        self.cache.lock().position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.cache.lock().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached contact sharing an email or phone with `fields`, other than `exclude`.
    ///
    /// Only a hint: the cache may be stale, and the store decides.
    pub fn duplicate_hint(
        &self,
        fields: &ContactFields,
        exclude: Option<&ContactId>,
    ) -> Option<DuplicateField> {
        let email = fields.email.trim();
        let phone = fields.phone_number.trim();
        let cache = self.cache.lock();

        let others = cache
            .contacts
            .iter()
            .filter(|c| Some(&c.id) != exclude);

        for contact in others {
            if contact.email.as_str() == email {
                return Some(DuplicateField::Email);
            }
            if contact.phone_number.as_str() == phone {
                return Some(DuplicateField::PhoneNumber);
            }
        }
        None
    }

    /// Validate locally, then create through the store and append the result.
    ///
    /// Invalid input never reaches the store. A confirmation for an id that
    /// was deleted while the request was in flight is reported as `NotFound`
    /// and not written.
    pub async fn create(&self, fields: &ContactFields) -> DirectoryResult<Contact> {
        fields.validate()?;

        if let Some(field) = self.duplicate_hint(fields, None) {
            debug!(%field, "Cached contact already uses this value");
        }

        let created = self
            .repo
            .create(fields)
            .await
            .inspect_err(|e| log_failure("create", e))?;

        let mut cache = self.cache.lock();
        if cache.gone.contains(&created.id) {
            warn!(id = %created.id, "Create confirmed for a contact already deleted");
            return Err(DirectoryError::NotFound(created.id));
        }
        match cache.position(&created.id) {
            Some(index) => cache.contacts[index] = created.clone(),
            None => cache.contacts.push(created.clone()),
        }

        info!(id = %created.id, "Contact added to cache");
        Ok(created)
    }

    /// Validate locally, update through the store and replace the cached record.
    ///
    /// A confirmation for an id that left the cache while the request was in
    /// flight is reported as `NotFound` and not written. A confirmation older
    /// than one already applied for the same id is returned but not written.
    pub async fn update(&self, id: &ContactId, patch: &ContactPatch) -> DirectoryResult<Contact> {
        patch.validate()?;

        let ticket = self.cache.lock().issue_ticket();

        let result = self.repo.update(id, patch).await;

        let mut cache = self.cache.lock();
        let updated = match result {
            Ok(updated) => updated,
            Err(e) => {
                log_failure("update", &e);
                if e.is_not_found() {
                    cache.remove(id);
                }
                return Err(e);
            }
        };

        let Some(index) = cache.position(id) else {
            warn!(id = %id, "Update confirmed for a contact no longer cached");
            return Err(DirectoryError::NotFound(id.clone()));
        };

        if cache.applied.get(id).is_some_and(|&newest| newest > ticket) {
            warn!(id = %id, ticket, "Discarding stale update response");
            return Ok(updated);
        }

        cache.contacts[index] = updated.clone();
        cache.applied.insert(id.clone(), ticket);

        info!(id = %id, "Cached contact updated");
        Ok(updated)
    }

    /// Delete through the store and evict the id.
    ///
    /// `NotFound` also evicts, since the contact is gone either way.
    pub async fn delete(&self, id: &ContactId) -> DirectoryResult<()> {
        let result = self.repo.delete(id).await;

        if let Err(e) = &result {
            log_failure("delete", e);
            if !e.is_not_found() {
                return result;
            }
        }

        if self.cache.lock().remove(id) {
            info!(id = %id, "Contact removed from cache");
        }
        result
    }

    /// Evict ids confirmed gone by some other path, e.g. a bulk delete.
    pub fn apply_deleted<'a>(&self, ids: impl IntoIterator<Item = &'a ContactId>) -> usize {
        let gone: HashSet<&ContactId> = ids.into_iter().collect();
        let mut cache = self.cache.lock();

        let before = cache.contacts.len();
        cache.contacts.retain(|c| !gone.contains(&c.id));
        cache.applied.retain(|id, _| !gone.contains(id));
        cache.gone.extend(gone.into_iter().cloned());

        before - cache.contacts.len()
    }

    /// Evict a single id after a read reported it missing.
    pub(crate) fn evict(&self, id: &ContactId) {
        self.cache.lock().remove(id);
    }
}
