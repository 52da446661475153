//! Contact search and pagination.

pub mod engine;

pub use engine::{ContactQuery, ContactQueryEngine, QueryPage};
