//! Session-side view of the contact list.

pub mod client_state;

pub use client_state::ClientSyncState;
