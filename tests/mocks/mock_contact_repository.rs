use async_trait::async_trait;
use contact_directory::domain::ContactId;
use contact_directory::error::{DirectoryError, DirectoryResult, DuplicateField};
use contact_directory::models::{Contact, ContactFields, ContactPatch};
use contact_directory::repositories::ContactRepository;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock contact repository for testing.
///
/// Provides an in-memory implementation of ContactRepository that can be
/// seeded with test data, tracks method calls for verification, and can be
/// told to fail or to delay responses.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockContactRepository {
    contacts: Arc<Mutex<Vec<Contact>>>,
    next_seq: Arc<Mutex<u64>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    /// Methods that answer with a transport error
    offline: Arc<Mutex<HashSet<String>>>,
    /// Per-call response delays for `update`, consumed front to back
    update_delays: Arc<Mutex<VecDeque<Duration>>>,
    /// Per-call response delays for `create`, consumed front to back
    create_delays: Arc<Mutex<VecDeque<Duration>>>,
}

#[allow(dead_code)]
impl MockContactRepository {
    /// Create a new empty MockContactRepository.
    pub fn new() -> Self {
        Self {
            contacts: Arc::new(Mutex::new(Vec::new())),
            next_seq: Arc::new(Mutex::new(0)),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            offline: Arc::new(Mutex::new(HashSet::new())),
            update_delays: Arc::new(Mutex::new(VecDeque::new())),
            create_delays: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Store a contact built from `fields` directly, bypassing call tracking.
    pub fn seed(&self, fields: ContactFields) -> Contact {
        let id = {
            let mut seq = self.next_seq.lock().unwrap();
            let id = ContactId::from_sequence(*seq);
            *seq += 1;
            id
        };
        let contact = fields.into_contact(id).unwrap();
        self.contacts.lock().unwrap().push(contact.clone());
        contact
    }

    /// Delete a contact behind the client's back, as another actor would.
    pub fn remove_externally(&self, id: &ContactId) {
        self.contacts.lock().unwrap().retain(|c| &c.id != id);
    }

    /// Make `method` fail with a transport error until `go_online`.
    pub fn go_offline(&self, method: &str) {
        self.offline.lock().unwrap().insert(method.to_string());
    }

    pub fn go_online(&self, method: &str) {
        self.offline.lock().unwrap().remove(method);
    }

    /// Delay the response of the next `update` call.
    pub fn delay_next_update(&self, delay: Duration) {
        self.update_delays.lock().unwrap().push_back(delay);
    }

    /// Delay the response of the next `create` call.
    pub fn delay_next_create(&self, delay: Duration) {
        self.create_delays.lock().unwrap().push_back(delay);
    }

    pub fn stored(&self) -> Vec<Contact> {
        self.contacts.lock().unwrap().clone()
    }

    pub fn contains(&self, id: &ContactId) -> bool {
        self.contacts.lock().unwrap().iter().any(|c| &c.id == id)
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Reset all call counts.
    pub fn reset_call_counts(&self) {
        let mut counts = self.call_counts.lock().unwrap();
        counts.clear();
    }

    fn track_call(&self, method: &str) -> DirectoryResult<()> {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;

        if self.offline.lock().unwrap().contains(method) {
            return Err(DirectoryError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn check_unique(contacts: &[Contact], candidate: &Contact) -> DirectoryResult<()> {
        for other in contacts.iter().filter(|c| c.id != candidate.id) {
            if other.email == candidate.email {
                return Err(DirectoryError::duplicate(
                    DuplicateField::Email,
                    candidate.email.as_str(),
                ));
            }
            if other.phone_number == candidate.phone_number {
                return Err(DirectoryError::duplicate(
                    DuplicateField::PhoneNumber,
                    candidate.phone_number.as_str(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for MockContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn list(&self) -> DirectoryResult<Vec<Contact>> {
        self.track_call("list")?;
        Ok(self.stored())
    }

    async fn get(&self, id: &ContactId) -> DirectoryResult<Contact> {
        self.track_call("get")?;

        let contacts = self.contacts.lock().unwrap();
        contacts
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))
    }

    async fn create(&self, fields: &ContactFields) -> DirectoryResult<Contact> {
        self.track_call("create")?;

        let contact = {
            let mut contacts = self.contacts.lock().unwrap();
            let mut seq = self.next_seq.lock().unwrap();
            let contact = fields.clone().into_contact(ContactId::from_sequence(*seq))?;
            Self::check_unique(&contacts, &contact)?;

            *seq += 1;
            contacts.push(contact.clone());
            contact
        };

        let delay = self.create_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(contact)
    }

    async fn update(&self, id: &ContactId, patch: &ContactPatch) -> DirectoryResult<Contact> {
        self.track_call("update")?;

        // Applied in arrival order; only the response is delayed
        let updated = {
            let mut contacts = self.contacts.lock().unwrap();
            let index = contacts
                .iter()
                .position(|c| &c.id == id)
                .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;
            let updated = patch.apply_to(&contacts[index])?;
            Self::check_unique(&contacts, &updated)?;
            contacts[index] = updated.clone();
            updated
        };

        let delay = self.update_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(updated)
    }

    async fn delete(&self, id: &ContactId) -> DirectoryResult<()> {
        self.track_call("delete")?;

        let mut contacts = self.contacts.lock().unwrap();
        let before = contacts.len();
        contacts.retain(|c| &c.id != id);

        if contacts.len() == before {
            return Err(DirectoryError::NotFound(id.clone()));
        }
        Ok(())
    }
}
