//! Shared application state

use finsight_auth::AuthSession;
use finsight_core::Agent;
use std::sync::Arc;

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    /// The coordinating agent that produces reports
    pub coordinator: Arc<dyn Agent>,
    /// Hosted auth wrapper with the cached access token
    pub auth: Arc<AuthSession>,
}

impl AppState {
    /// Create a new application state
    pub fn new(coordinator: Arc<dyn Agent>, auth: Arc<AuthSession>) -> Self {
        Self { coordinator, auth }
    }
}
