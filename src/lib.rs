//! Contact Directory - a contact store that keeps email and phone numbers
//! unique, with search, pagination, multi-select, bulk delete and export.
//!
//! # Architecture
//!
//! - **domain**: Value objects and the declarative field schema
//! - **models**: Contact record and its create/update inputs
//! - **error**: Error types for precise error handling
//! - **store**: Authoritative in-process store with atomic uniqueness checks
//! - **repositories**: Async persistence seam over the store or a REST backend
//! - **client**: Blocking HTTP client for the REST backend plus async wrapper
//! - **query**: Filtering and pagination
//! - **bulk**: Selection tracking, bulk delete and export
//! - **export**: JSON and CSV serialization
//! - **sync**: Client-side cache reconciled against confirmed results
//! - **session**: One user's working state, composing the above
//! - **server**: MCP protocol server
//! - **config**: Configuration management from environment variables
//! - **metrics**: HTTP request counters

pub mod bulk;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod metrics;
pub mod models;
pub mod query;
pub mod repositories;
pub mod server;
pub mod session;
pub mod store;
pub mod sync;

pub use bulk::{BulkDeleteOutcome, BulkOperationCoordinator};
pub use client::ContactsClient;
pub use config::Config;
pub use domain::{ContactId, EmailAddress, FieldErrors, PhoneNumber, ValidationError};
pub use error::{ConfigError, DirectoryError, DirectoryResult, DuplicateField};
pub use export::{ExportFile, ExportFormat};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{Contact, ContactFields, ContactPatch};
pub use query::{ContactQuery, ContactQueryEngine, QueryPage};
pub use server::ContactDirectoryServer;
pub use session::ContactSession;
pub use store::ContactStore;
pub use sync::ClientSyncState;
