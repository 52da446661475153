//! Multi-select and bulk delete/export.

pub mod coordinator;

pub use coordinator::{BulkDeleteOutcome, BulkOperationCoordinator};
