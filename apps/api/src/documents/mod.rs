//! JSON persistence for resumes and cover letters, keyed by UUID.

pub mod handlers;
pub mod store;

pub use store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
