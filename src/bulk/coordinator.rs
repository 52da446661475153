//! Selection tracking and bulk actions over the current filtered view.

use crate::domain::ContactId;
use crate::error::{DirectoryError, DirectoryResult};
use crate::export::{self, ExportFile, ExportFormat};
use crate::models::Contact;
use crate::repositories::ContactRepository;
use futures::future::join_all;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// Per-id result of a bulk delete.
///
/// Every id that was selected appears in exactly one of the two sets.
#[derive(Debug, Default)]
pub struct BulkDeleteOutcome {
    pub succeeded: BTreeSet<ContactId>,
    pub failed: BTreeMap<ContactId, DirectoryError>,
}

impl BulkDeleteOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ids no longer in the active set: deleted now, or already gone.
    pub fn removed_ids(&self) -> impl Iterator<Item = &ContactId> {
        self.succeeded.iter().chain(
            self.failed
                .iter()
                .filter(|(_, err)| err.is_not_found())
                .map(|(id, _)| id),
        )
    }
}

/// Tracks which contacts in the current view are selected.
///
/// The selection is always a subset of the view. Narrowing the view drops any
/// selected ids that fall outside it.
#[derive(Debug, Default)]
pub struct BulkOperationCoordinator {
    /// Ids of the filtered view, in display order
    view: Vec<ContactId>,

    selected: HashSet<ContactId>,
}

impl BulkOperationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the view with `ids` and drop selected ids no longer in it.
    pub fn sync_view(&mut self, ids: Vec<ContactId>) {
        let visible: HashSet<&ContactId> = ids.iter().collect();
        self.selected.retain(|id| visible.contains(id));
        self.view = ids;
    }

    /// Select every id in the current view.
    pub fn select_all(&mut self) {
        self.selected = self.view.iter().cloned().collect();
    }

    /// Flip membership of `id`. Returns whether it is selected afterwards.
    ///
    /// # Errors
    ///
    /// `NotInView` if `id` is not part of the current view.
    pub fn toggle(&mut self, id: &ContactId) -> DirectoryResult<bool> {
        if !self.view.contains(id) {
            return Err(DirectoryError::NotInView(id.clone()));
        }

        if self.selected.remove(id) {
            Ok(false)
        } else {
            self.selected.insert(id.clone());
            Ok(true)
        }
    }

    /// Drop `id` from both view and selection, e.g. after a single delete.
    pub fn forget(&mut self, id: &ContactId) {
        self.selected.remove(id);
        self.view.retain(|v| v != id);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &ContactId) -> bool {
        self.selected.contains(id)
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// Whether the view is non-empty and every id in it is selected.
    pub fn all_selected(&self) -> bool {
        !self.view.is_empty() && self.selected.len() == self.view.len()
    }

    /// Selected ids in view order.
    pub fn selected_ids(&self) -> Vec<ContactId> {
        self.view
            .iter()
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect()
    }

    /// Delete every selected contact concurrently.
    ///
    /// The selection is cleared before the first request goes out. Each delete
    /// is independent: failures are reported per id and never roll back the
    /// ones that succeeded.
    pub async fn bulk_delete(&mut self, repo: &dyn ContactRepository) -> BulkDeleteOutcome {
        let targets = self.selected_ids();
        self.selected.clear();

        if targets.is_empty() {
            return BulkDeleteOutcome::default();
        }

        let results = join_all(targets.iter().map(|id| repo.delete(id))).await;

        let mut outcome = BulkDeleteOutcome::default();
        for (id, result) in targets.into_iter().zip(results) {
            match result {
                Ok(()) => {
                    outcome.succeeded.insert(id);
                }
                Err(e) => {
                    outcome.failed.insert(id, e);
                }
            }
        }

        self.view.retain(|id| !outcome.succeeded.contains(id));

        if outcome.is_complete_success() {
            info!(deleted = outcome.succeeded.len(), "Bulk delete completed");
        } else {
            warn!(
                deleted = outcome.succeeded.len(),
                failed = outcome.failed.len(),
                "Bulk delete partially failed"
            );
        }

        outcome
    }

    /// Serialize the selected contacts in `snapshot` order.
    ///
    /// The selection is untouched; callers clear it once the file is saved.
    ///
    /// # Errors
    ///
    /// `Export` if nothing is selected or encoding fails.
    pub fn export(&self, snapshot: &[Contact], format: ExportFormat) -> DirectoryResult<ExportFile> {
        if self.selected.is_empty() {
            return Err(DirectoryError::Export("no contacts selected".to_string()));
        }

        let chosen: Vec<Contact> = snapshot
            .iter()
            .filter(|contact| self.selected.contains(&contact.id))
            .cloned()
            .collect();

        let file = export::serialize_contacts(&chosen, format)?;

        debug!(count = chosen.len(), format = %format, "Serialized selected contacts");
        Ok(file)
    }
}
