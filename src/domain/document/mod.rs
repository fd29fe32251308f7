//! Document domain - one JSON value per file, owned by a user

mod entity;
mod object_store;
mod repository;

pub use entity::{DocumentId, DocumentMetadata};
pub use object_store::ObjectStore;
#[cfg(test)]
pub use object_store::MockObjectStore;
pub use repository::DocumentRepository;
