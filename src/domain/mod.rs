//! Domain value objects and types.
//!
//! Type-safe wrappers for contact ids, email addresses and phone numbers, plus
//! the declarative field schema shared by client pre-checks and the store.
//! Value objects validate at construction, so a `Contact` holding them is
//! well-formed by type.

pub mod contact_id;
pub mod email;
pub mod errors;
pub mod phone;
pub mod schema;

pub use contact_id::ContactId;
pub use email::EmailAddress;
pub use errors::{FieldErrors, ValidationError};
pub use phone::PhoneNumber;
pub use schema::{FieldRule, CONTACT_SCHEMA};
