//! External identity provider seam
//!
//! The OAuth code exchange happens outside the core; only the resulting
//! identity tuple is consumed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Identity returned by the provider after a successful code exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// Stable subject id
    pub subject: String,
    pub email: String,
    pub name: String,
}

/// Identity provider operations needed by the login flow
#[async_trait]
pub trait IdentityProvider: Send + Sync + Debug {
    /// URL the browser is redirected to in order to start a login
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for the caller's identity
    async fn exchange_code(&self, code: &str) -> Result<ExternalIdentity, DomainError>;
}
