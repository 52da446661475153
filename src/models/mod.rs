//! Data models for contact records.
//!
//! `Contact` is the persisted record; `ContactFields` and `ContactPatch` are the
//! create and partial-update inputs, validated against the domain field schema.

pub mod contact;

pub use contact::{Contact, ContactFields, ContactPatch};
