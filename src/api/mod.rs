//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod middleware;
pub mod public;
pub mod router;
pub mod state;
pub mod types;
pub mod web;

pub use middleware::{RequireApiKey, RequireSession};
pub use router::create_router;
pub use state::AppState;
