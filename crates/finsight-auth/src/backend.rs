//! Hosted auth provider backend
//!
//! `AuthBackend` is the seam between the session wrapper and the hosted
//! provider; `HostedAuthBackend` is the HTTP implementation against the
//! provider's backend API.

use crate::error::{AuthError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A user resolved by the hosted auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-issued user identifier
    pub user_id: String,
    /// User email address
    pub email: String,
}

/// An access token minted by the hosted auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// The bearer token value
    pub access_token: String,
}

/// Backend API of the hosted auth provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Mint a short-lived access token for a user
    async fn create_access_token(
        &self,
        user_id: &str,
        duration_minutes: u32,
    ) -> Result<AccessToken>;

    /// Validate an access token and return the user it belongs to
    ///
    /// Returns `AuthError::Unauthorized` when the provider rejects the token.
    async fn validate_access_token(&self, access_token: &str) -> Result<User>;

    /// Revoke every active session of a user
    async fn logout_all_sessions(&self, user_id: &str) -> Result<()>;
}

/// HTTP implementation of `AuthBackend`
pub struct HostedAuthBackend {
    client: Client,
    auth_url: String,
    integration_api_key: String,
}

#[derive(Debug, Serialize)]
struct CreateTokenRequest<'a> {
    user_id: &'a str,
    duration_in_minutes: u32,
}

impl HostedAuthBackend {
    /// Create a new backend client
    ///
    /// # Arguments
    ///
    /// * `auth_url` - Base URL of the hosted auth environment
    /// * `integration_api_key` - Backend integration API key
    pub fn new(auth_url: impl Into<String>, integration_api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            integration_api_key: integration_api_key.into(),
        })
    }

    /// Create a backend client from environment variables
    ///
    /// Reads `AUTH_URL` and `AUTH_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let auth_url = std::env::var("AUTH_URL")
            .map_err(|_| AuthError::Configuration("AUTH_URL environment variable not set".into()))?;
        let api_key = std::env::var("AUTH_API_KEY").map_err(|_| {
            AuthError::Configuration("AUTH_API_KEY environment variable not set".into())
        })?;
        Self::new(auth_url, api_key)
    }

    /// Base URL of the hosted auth environment
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }
}

#[async_trait]
impl AuthBackend for HostedAuthBackend {
    #[instrument(skip(self))]
    async fn create_access_token(
        &self,
        user_id: &str,
        duration_minutes: u32,
    ) -> Result<AccessToken> {
        debug!("Minting access token");

        let response = self
            .client
            .post(format!("{}/api/backend/v1/access_token", self.auth_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.integration_api_key),
            )
            .json(&CreateTokenRequest {
                user_id,
                duration_in_minutes: duration_minutes,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::RequestFailed(format!(
                "token mint failed with HTTP {status}: {body}"
            )));
        }

        response
            .json::<AccessToken>()
            .await
            .map_err(|e| AuthError::UnexpectedResponse(format!("token response: {e}")))
    }

    #[instrument(skip(self, access_token))]
    async fn validate_access_token(&self, access_token: &str) -> Result<User> {
        let response = self
            .client
            .get(format!("{}/api/v1/me", self.auth_url))
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(AuthError::Unauthorized),
            status if status.is_success() => response
                .json::<User>()
                .await
                .map_err(|e| AuthError::UnexpectedResponse(format!("user response: {e}"))),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AuthError::RequestFailed(format!(
                    "token validation failed with HTTP {status}: {body}"
                )))
            }
        }
    }

    #[instrument(skip(self))]
    async fn logout_all_sessions(&self, user_id: &str) -> Result<()> {
        let response = self
            .client
            .post(format!(
                "{}/api/backend/v1/user/{user_id}/logout_all_sessions",
                self.auth_url
            ))
            .header(
                "Authorization",
                format!("Bearer {}", self.integration_api_key),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::RequestFailed(format!(
                "logout failed with HTTP {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_trims_trailing_slash() {
        let backend = HostedAuthBackend::new("https://auth.example.com/", "key").unwrap();
        assert_eq!(backend.auth_url(), "https://auth.example.com");
    }

    #[test]
    fn test_from_env_requires_variables() {
        unsafe {
            std::env::remove_var("AUTH_URL");
            std::env::remove_var("AUTH_API_KEY");
        }
        assert!(HostedAuthBackend::from_env().is_err());
    }

    #[test]
    fn test_user_deserialization() {
        let user: User =
            serde_json::from_str(r#"{"user_id": "u-1", "email": "trader@example.com"}"#).unwrap();
        assert_eq!(user.user_id, "u-1");
        assert_eq!(user.email, "trader@example.com");
    }
}
