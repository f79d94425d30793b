//! Storage collaborator: user, post and comment persistence.
//!
//! The API and auth layers only see the traits in [`store`]; the in-memory
//! implementation backs dev runs and tests.

pub mod in_memory;
pub mod store;

pub use in_memory::InMemoryStore;
pub use store::{BlogStore, CommentStore, Page, PostStore, PrincipalField, PrincipalStore, StoreError};
