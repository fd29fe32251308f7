//! User domain

mod entity;
mod repository;

pub use entity::{User, UserId};
pub use repository::UserRepository;
