//! Filtering and pagination over a contact snapshot.
//!
//! Pure functions of their inputs. Nothing is cached between calls, so every
//! call reflects exactly the snapshot it is given.

use crate::domain::ContactId;
use crate::models::Contact;
use serde::Serialize;

/// What the user is looking at: search text plus page position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactQuery {
    /// Case-insensitive substring; empty matches everything
    pub filter: String,

    /// Zero-based page index
    pub page: usize,

    pub page_size: usize,
}

impl ContactQuery {
    pub fn new(filter: impl Into<String>, page: usize, page_size: usize) -> Self {
        Self {
            filter: filter.into(),
            page,
            page_size,
        }
    }
}

/// One page of filtered results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPage {
    pub items: Vec<Contact>,

    /// Size of the whole filtered sequence, not just this page
    pub total: usize,

    pub page: usize,
    pub page_size: usize,
}

impl QueryPage {
    /// Number of non-empty pages the filtered sequence spans.
    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.total.div_ceil(self.page_size)
        }
    }
}

/// Stateless query evaluator.
pub struct ContactQueryEngine;

impl ContactQueryEngine {
    /// Whether any searchable field of `contact` contains `needle`.
    ///
    /// `needle` must already be lowercase.
    fn matches(contact: &Contact, needle: &str) -> bool {
        needle.is_empty()
            || contact
                .searchable_fields()
                .any(|field| field.to_lowercase().contains(needle))
    }

    /// Contacts matching `filter`, in snapshot order.
    pub fn filter<'a>(snapshot: &'a [Contact], filter: &str) -> Vec<&'a Contact> {
        let needle = filter.to_lowercase();
        snapshot
            .iter()
            .filter(|contact| Self::matches(contact, &needle))
            .collect()
    }

    /// Ids of the contacts matching `filter`, in snapshot order.
    pub fn filtered_ids(snapshot: &[Contact], filter: &str) -> Vec<ContactId> {
        Self::filter(snapshot, filter)
            .into_iter()
            .map(|contact| contact.id.clone())
            .collect()
    }

    /// The half-open slice `[page * page_size, page * page_size + page_size)`.
    ///
    /// Pages past the end are empty rather than an error.
    pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
        let start = page.saturating_mul(page_size).min(items.len());
        let end = start.saturating_add(page_size).min(items.len());
        &items[start..end]
    }

    /// Filter then paginate.
    pub fn run(snapshot: &[Contact], query: &ContactQuery) -> QueryPage {
        let filtered = Self::filter(snapshot, &query.filter);
        let items = Self::paginate(&filtered, query.page, query.page_size)
            .iter()
            .map(|contact| (*contact).clone())
            .collect();

        QueryPage {
            items,
            total: filtered.len(),
            page: query.page,
            page_size: query.page_size,
        }
    }
}
