//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod cache;
pub mod document;
pub mod error;
pub mod identity;
pub mod rate_limit;
pub mod resource;
pub mod session;
pub mod subscription;
pub mod user;

pub use api_key::{ApiKey, ApiKeyRepository};
pub use cache::{Cache, CacheExt, CacheKeys};
pub use document::{DocumentId, DocumentMetadata, DocumentRepository, ObjectStore};
pub use error::DomainError;
pub use identity::{ExternalIdentity, IdentityProvider};
pub use rate_limit::{RateLimitDecision, TokenBucket, TokenBucketStore};
pub use session::{Session, SessionRepository};
pub use subscription::SubscriptionSnapshot;
pub use user::{User, UserId, UserRepository};
