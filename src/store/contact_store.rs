//! Authoritative in-process contact store.
//!
//! All records live behind one `RwLock`. Create and update hold the write
//! lock across the uniqueness check and the write, so no two writers can both
//! pass the check for the same email or phone number, and readers never see a
//! state where two active contacts share one.

use crate::domain::{ContactId, EmailAddress, PhoneNumber};
use crate::error::{DirectoryError, DirectoryResult, DuplicateField};
use crate::models::{Contact, ContactFields, ContactPatch};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
struct StoreState {
    /// Active records keyed by creation sequence, so iteration is creation order
    records: BTreeMap<u64, Contact>,

    /// id -> creation sequence
    slots: HashMap<ContactId, u64>,

    emails: HashMap<EmailAddress, ContactId>,

    phones: HashMap<PhoneNumber, ContactId>,

    /// Next sequence to issue. Never decremented, so ids are never reused.
    next_seq: u64,
}

impl StoreState {
    /// Reject `candidate` if its email or phone belongs to another active contact.
    fn check_unique(&self, candidate: &Contact) -> DirectoryResult<()> {
        if let Some(owner) = self.emails.get(&candidate.email) {
            if *owner != candidate.id {
                return Err(DirectoryError::duplicate(
                    DuplicateField::Email,
                    candidate.email.as_str(),
                ));
            }
        }

        if let Some(owner) = self.phones.get(&candidate.phone_number) {
            if *owner != candidate.id {
                return Err(DirectoryError::duplicate(
                    DuplicateField::PhoneNumber,
                    candidate.phone_number.as_str(),
                ));
            }
        }

        Ok(())
    }

    fn index(&mut self, contact: &Contact) {
        self.emails.insert(contact.email.clone(), contact.id.clone());
        self.phones
            .insert(contact.phone_number.clone(), contact.id.clone());
    }

    fn unindex(&mut self, contact: &Contact) {
        self.emails.remove(&contact.email);
        self.phones.remove(&contact.phone_number);
    }
}

/// The authoritative set of active contacts.
///
/// Enforces that no two active contacts share an email or phone number and
/// assigns ids on creation. Safe to share across threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct ContactStore {
    state: RwLock<StoreState>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `fields`, check uniqueness against every active contact and
    /// insert under a fresh id, all under one write lock.
    ///
    /// # Errors
    ///
    /// `Validation` for missing or malformed fields, `Duplicate` if the email or
    /// phone is already in use. Nothing is written on error.
    pub fn create(&self, fields: ContactFields) -> DirectoryResult<Contact> {
        // Pure format checks need no lock.
        fields.validate()?;

        let mut state = self.state.write();
        let seq = state.next_seq;
        let contact = fields.into_contact(ContactId::from_sequence(seq))?;

        state.check_unique(&contact)?;

        state.next_seq += 1;
        state.index(&contact);
        state.slots.insert(contact.id.clone(), seq);
        state.records.insert(seq, contact.clone());

        tracing::info!(id = %contact.id, "Contact created");
        Ok(contact)
    }

    /// Fetch one active contact.
    pub fn get(&self, id: &ContactId) -> DirectoryResult<Contact> {
        let state = self.state.read();
        state
            .slots
            .get(id)
            .and_then(|seq| state.records.get(seq))
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))
    }

    /// Merge `patch` onto the record, re-validate, re-check uniqueness against
    /// every other active contact and persist, all under one write lock.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is not active, `Validation` or `Duplicate` as for
    /// `create`. The stored record is unchanged on error.
    pub fn update(&self, id: &ContactId, patch: &ContactPatch) -> DirectoryResult<Contact> {
        patch.validate()?;

        let mut state = self.state.write();
        let seq = *state
            .slots
            .get(id)
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;
        let current = state
            .records
            .get(&seq)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;

        let updated = patch.apply_to(&current)?;
        state.check_unique(&updated)?;

        state.unindex(&current);
        state.index(&updated);
        state.records.insert(seq, updated.clone());

        tracing::info!(id = %id, "Contact updated");
        Ok(updated)
    }

    /// Permanently remove a contact. Its id is never issued again.
    pub fn delete(&self, id: &ContactId) -> DirectoryResult<()> {
        let mut state = self.state.write();
        let seq = state
            .slots
            .remove(id)
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;

        if let Some(removed) = state.records.remove(&seq) {
            state.unindex(&removed);
        }

        tracing::info!(id = %id, "Contact deleted");
        Ok(())
    }

    /// Snapshot of all active contacts in creation order.
    pub fn list(&self) -> Vec<Contact> {
        self.state.read().records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
