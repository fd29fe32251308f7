//! Session domain

mod entity;
mod repository;

pub use entity::{hash_token, Session, SESSION_RENEWAL_WINDOW, SESSION_VALIDITY};
pub use repository::SessionRepository;
