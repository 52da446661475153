//! One user's working session over the contact directory.
//!
//! Composes the cached list, the current query (filter text and page) and the
//! bulk selection. Every list mutation and every filter change re-derives the
//! filtered view and reconciles the selection against it.

use crate::bulk::{BulkDeleteOutcome, BulkOperationCoordinator};
use crate::domain::ContactId;
use crate::error::DirectoryResult;
use crate::export::{ExportFile, ExportFormat};
use crate::models::{Contact, ContactFields, ContactPatch};
use crate::query::{ContactQuery, ContactQueryEngine, QueryPage};
use crate::repositories::ContactRepository;
use crate::sync::ClientSyncState;
use std::sync::Arc;
use tracing::debug;

pub struct ContactSession {
    sync: ClientSyncState,
    bulk: BulkOperationCoordinator,
    filter: String,
    page: usize,
    page_size: usize,
}

impl ContactSession {
    /// Empty session. Call [`ContactSession::load`] to populate it.
    pub fn new(repo: Arc<dyn ContactRepository>, page_size: usize) -> Self {
        Self {
            sync: ClientSyncState::new(repo),
            bulk: BulkOperationCoordinator::new(),
            filter: String::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn sync_state(&self) -> &ClientSyncState {
        &self.sync
    }

    /// Fetch the full list from the store and rebuild the view.
    pub async fn load(&mut self) -> DirectoryResult<usize> {
        let count = self.sync.fetch_all().await?;
        self.refresh_view();
        Ok(count)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the search text. Returns to the first page.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page = 0;
        self.refresh_view();
        debug!(filter = %self.filter, "Filter changed");
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Change rows per page (at least 1). Returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// The page currently in view.
    pub fn current_page(&self) -> QueryPage {
        let query = ContactQuery::new(self.filter.clone(), self.page, self.page_size);
        ContactQueryEngine::run(&self.sync.snapshot(), &query)
    }

    /// Every contact matching the filter, unpaginated, in creation order.
    pub fn filtered_view(&self) -> Vec<Contact> {
        let snapshot = self.sync.snapshot();
        ContactQueryEngine::filter(&snapshot, &self.filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Read one contact from the store. A `NotFound` evicts it locally.
    pub async fn get(&mut self, id: &ContactId) -> DirectoryResult<Contact> {
        let result = self.sync.repository().get(id).await;
        if let Err(e) = &result {
            if e.is_not_found() {
                self.sync.evict(id);
                self.bulk.forget(id);
            }
        }
        result
    }

    pub async fn create(&mut self, fields: &ContactFields) -> DirectoryResult<Contact> {
        let result = self.sync.create(fields).await;
        self.refresh_view();
        result
    }

    pub async fn update(&mut self, id: &ContactId, patch: &ContactPatch) -> DirectoryResult<Contact> {
        let result = self.sync.update(id, patch).await;
        self.refresh_view();
        result
    }

    pub async fn delete(&mut self, id: &ContactId) -> DirectoryResult<()> {
        let result = self.sync.delete(id).await;
        if result.as_ref().map_or_else(|e| e.is_not_found(), |_| true) {
            self.bulk.forget(id);
        }
        self.refresh_view();
        result
    }

    pub fn toggle(&mut self, id: &ContactId) -> DirectoryResult<bool> {
        self.bulk.toggle(id)
    }

    /// Select every contact matching the filter, across all pages.
    pub fn select_all(&mut self) {
        self.bulk.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.bulk.clear_selection();
    }

    pub fn selected_ids(&self) -> Vec<ContactId> {
        self.bulk.selected_ids()
    }

    pub fn all_selected(&self) -> bool {
        self.bulk.all_selected()
    }

    /// Delete the selection and evict everything confirmed gone.
    pub async fn bulk_delete(&mut self) -> BulkDeleteOutcome {
        self.refresh_view();
        let outcome = self.bulk.bulk_delete(self.sync.repository()).await;
        self.sync.apply_deleted(outcome.removed_ids());
        self.refresh_view();
        outcome
    }

    /// Serialize the selection in full-list order.
    ///
    /// The selection stays as it is; call [`ContactSession::clear_selection`]
    /// once the file has been saved.
    pub fn export(&self, format: ExportFormat) -> DirectoryResult<ExportFile> {
        self.bulk.export(&self.sync.snapshot(), format)
    }

    fn refresh_view(&mut self) {
        let snapshot = self.sync.snapshot();
        self.bulk
            .sync_view(ContactQueryEngine::filtered_ids(&snapshot, &self.filter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::StoreContactRepository;
    use crate::store::ContactStore;

    async fn seeded(n: u64) -> ContactSession {
        let store = Arc::new(ContactStore::new());
        for i in 0..n {
            store
                .create(ContactFields::new(
                    format!("Person{}", i),
                    "Tester",
                    format!("p{}@x.com", i),
                    format!("{:010}", i),
                ))
                .unwrap();
        }
        let mut session = ContactSession::new(Arc::new(StoreContactRepository::new(store)), 3);
        session.load().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_filter_change_resets_page_and_selection() {
        let mut session = seeded(7).await;
        session.set_page(2);
        session.select_all();
        assert_eq!(session.selected_ids().len(), 7);

        session.set_filter("person1");
        assert_eq!(session.page(), 0);
        assert_eq!(session.selected_ids().len(), 1);
    }

    #[tokio::test]
    async fn test_page_size_change_resets_page() {
        let mut session = seeded(7).await;
        session.set_page(2);
        assert_eq!(session.current_page().items.len(), 1);

        session.set_page_size(0);
        assert_eq!(session.page(), 0);
        assert_eq!(session.page_size(), 1);
    }

    #[tokio::test]
    async fn test_delete_drops_selection() {
        let mut session = seeded(2).await;
        session.select_all();
        let first = session.selected_ids()[0].clone();

        session.delete(&first).await.unwrap();
        assert_eq!(session.selected_ids().len(), 1);
        assert_eq!(session.current_page().total, 1);
    }
}
