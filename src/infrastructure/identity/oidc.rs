//! OAuth 2.0 / OpenID Connect authorization code client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::identity::{ExternalIdentity, IdentityProvider};
use crate::domain::DomainError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// OAuth client registration and provider endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            auth_url: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            redirect_url: "http://localhost:8080/auth/callback".to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/userinfo.email".to_string(),
                "https://www.googleapis.com/auth/userinfo.profile".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(alias = "id")]
    sub: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
}

/// Identity provider speaking the authorization code flow
#[derive(Debug, Clone)]
pub struct OidcIdentityProvider {
    client: reqwest::Client,
    config: OAuthConfig,
    auth_url: Url,
}

impl OidcIdentityProvider {
    pub fn new(config: OAuthConfig) -> Result<Self, DomainError> {
        let auth_url = Url::parse(&config.auth_url).map_err(|e| {
            DomainError::configuration(format!("Invalid OAuth auth_url '{}': {}", config.auth_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            auth_url,
        })
    }

    async fn fetch_access_token(&self, code: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Authorization code exchange rejected");
            return Err(DomainError::unauthorized("code exchange wrong"));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DomainError::internal(format!("Invalid token response: {}", e)))?;

        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo, DomainError> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("Userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Userinfo request rejected");
            return Err(DomainError::unauthorized("failed getting user info"));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::internal(format!("Invalid userinfo response: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for OidcIdentityProvider {
    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state);
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<ExternalIdentity, DomainError> {
        let access_token = self.fetch_access_token(code).await?;
        let info = self.fetch_user_info(&access_token).await?;

        if info.sub.is_empty() {
            return Err(DomainError::unauthorized("identity provider returned no subject"));
        }

        debug!(subject = %info.sub, "Exchanged authorization code");

        Ok(ExternalIdentity {
            subject: info.sub,
            email: info.email,
            name: info.name,
        })
    }
}
