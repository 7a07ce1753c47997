//! Auth session with a cached access token
//!
//! The session holds at most one access token. `get_user` validates the
//! cached token when present; an unauthorized result discards the token,
//! mints a fresh one, and validates again - exactly one refresh, no
//! backoff. Every other error propagates unchanged.

use crate::backend::{AuthBackend, User};
use crate::error::{AuthError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Token lifetime requested on refresh, in minutes
const TOKEN_DURATION_MINUTES: u32 = 10;

/// Auth session wrapping the hosted provider with a single cached token
pub struct AuthSession {
    backend: Arc<dyn AuthBackend>,
    auth_url: String,
    access_token: Mutex<Option<String>>,
}

impl AuthSession {
    /// Create a new session around a provider backend
    pub fn new(backend: Arc<dyn AuthBackend>, auth_url: impl Into<String>) -> Self {
        Self {
            backend,
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            access_token: Mutex::new(None),
        }
    }

    /// Resolve the user, using the cached access token when possible
    ///
    /// The refresh path is entered only when no token is cached or when the
    /// provider rejected the cached token as unauthorized.
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        let cached = self.access_token.lock().await.clone();

        let Some(token) = cached else {
            debug!("No cached access token, refreshing");
            return self.force_refresh_user(user_id).await;
        };

        match self.backend.validate_access_token(&token).await {
            Ok(user) => Ok(user),
            Err(AuthError::Unauthorized) => {
                info!("Cached access token rejected, refreshing once");
                self.force_refresh_user(user_id).await
            }
            Err(e) => Err(e),
        }
    }

    /// Discard the cached token, mint a fresh one, and validate it
    async fn force_refresh_user(&self, user_id: &str) -> Result<User> {
        let minted = self
            .backend
            .create_access_token(user_id, TOKEN_DURATION_MINUTES)
            .await?;

        let user = self
            .backend
            .validate_access_token(&minted.access_token)
            .await?;

        *self.access_token.lock().await = Some(minted.access_token);
        Ok(user)
    }

    /// Revoke all provider sessions for the user and drop the cached token
    pub async fn log_out(&self, user_id: &str) -> Result<()> {
        self.backend.logout_all_sessions(user_id).await?;
        *self.access_token.lock().await = None;
        info!("Logged out and cleared cached access token");
        Ok(())
    }

    /// URL of the provider-hosted account page
    pub fn account_url(&self) -> String {
        format!("{}/account", self.auth_url)
    }

    /// Whether an access token is currently cached
    pub async fn has_cached_token(&self) -> bool {
        self.access_token.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AccessToken, MockAuthBackend};

    fn user() -> User {
        User {
            user_id: "u-1".to_string(),
            email: "trader@example.com".to_string(),
        }
    }

    fn token(value: &str) -> AccessToken {
        AccessToken {
            access_token: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_call_mints_a_token() {
        let mut backend = MockAuthBackend::new();
        backend
            .expect_create_access_token()
            .withf(|user_id, minutes| user_id == "u-1" && *minutes == TOKEN_DURATION_MINUTES)
            .times(1)
            .returning(|_, _| Ok(token("tok-1")));
        backend
            .expect_validate_access_token()
            .withf(|t| t == "tok-1")
            .times(1)
            .returning(|_| Ok(user()));

        let session = AuthSession::new(Arc::new(backend), "https://auth.example.com");
        assert!(!session.has_cached_token().await);

        let resolved = session.get_user("u-1").await.unwrap();
        assert_eq!(resolved.email, "trader@example.com");
        assert!(session.has_cached_token().await);
    }

    #[tokio::test]
    async fn test_cached_token_skips_refresh() {
        let mut backend = MockAuthBackend::new();
        // One mint for the first call, then validation only.
        backend
            .expect_create_access_token()
            .times(1)
            .returning(|_, _| Ok(token("tok-1")));
        backend
            .expect_validate_access_token()
            .times(2)
            .returning(|_| Ok(user()));

        let session = AuthSession::new(Arc::new(backend), "https://auth.example.com");

        session.get_user("u-1").await.unwrap();
        // Second call must not mint again; mockall would panic on times(1).
        session.get_user("u-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized_triggers_single_refresh() {
        let mut backend = MockAuthBackend::new();
        let mut seq = mockall::Sequence::new();

        backend
            .expect_create_access_token()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(token("stale")));
        backend
            .expect_validate_access_token()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(user()));
        // Second get_user: cached token now rejected.
        backend
            .expect_validate_access_token()
            .withf(|t| t == "stale")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AuthError::Unauthorized));
        backend
            .expect_create_access_token()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(token("fresh")));
        backend
            .expect_validate_access_token()
            .withf(|t| t == "fresh")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(user()));

        let session = AuthSession::new(Arc::new(backend), "https://auth.example.com");

        session.get_user("u-1").await.unwrap();
        let resolved = session.get_user("u-1").await.unwrap();
        assert_eq!(resolved.user_id, "u-1");
    }

    #[tokio::test]
    async fn test_non_auth_errors_propagate_without_refresh() {
        let mut backend = MockAuthBackend::new();
        backend
            .expect_create_access_token()
            .times(1)
            .returning(|_, _| Ok(token("tok-1")));
        backend
            .expect_validate_access_token()
            .times(2)
            .returning({
                let mut calls = 0;
                move |_| {
                    calls += 1;
                    if calls == 1 {
                        Ok(user())
                    } else {
                        Err(AuthError::RequestFailed("provider down".into()))
                    }
                }
            });

        let session = AuthSession::new(Arc::new(backend), "https://auth.example.com");

        session.get_user("u-1").await.unwrap();
        let result = session.get_user("u-1").await;
        assert!(matches!(result, Err(AuthError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_refresh_failure_does_not_cache_token() {
        let mut backend = MockAuthBackend::new();
        backend
            .expect_create_access_token()
            .times(1)
            .returning(|_, _| Err(AuthError::RequestFailed("mint failed".into())));

        let session = AuthSession::new(Arc::new(backend), "https://auth.example.com");

        assert!(session.get_user("u-1").await.is_err());
        assert!(!session.has_cached_token().await);
    }

    #[tokio::test]
    async fn test_log_out_revokes_and_clears() {
        let mut backend = MockAuthBackend::new();
        backend
            .expect_create_access_token()
            .times(1)
            .returning(|_, _| Ok(token("tok-1")));
        backend
            .expect_validate_access_token()
            .times(1)
            .returning(|_| Ok(user()));
        backend
            .expect_logout_all_sessions()
            .withf(|user_id| user_id == "u-1")
            .times(1)
            .returning(|_| Ok(()));

        let session = AuthSession::new(Arc::new(backend), "https://auth.example.com");

        session.get_user("u-1").await.unwrap();
        assert!(session.has_cached_token().await);

        session.log_out("u-1").await.unwrap();
        assert!(!session.has_cached_token().await);
    }

    #[test]
    fn test_account_url() {
        let backend = MockAuthBackend::new();
        let session = AuthSession::new(Arc::new(backend), "https://auth.example.com/");
        assert_eq!(session.account_url(), "https://auth.example.com/account");
    }
}
