//! Identity provider adapters

mod oidc;

pub use oidc::{OAuthConfig, OidcIdentityProvider};
