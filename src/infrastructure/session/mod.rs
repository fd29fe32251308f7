//! Session registry implementations and lifecycle service

mod in_memory_repository;
mod postgres_repository;
mod service;

pub use in_memory_repository::InMemorySessionRepository;
pub use postgres_repository::PostgresSessionRepository;
pub use service::{CreatedSession, SessionService};
