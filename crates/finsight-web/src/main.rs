//! Web front end for the stock analysis service
//!
//! A single session-gated page: login against the hosted auth provider,
//! one query box, and the coordinator's markdown report rendered back.

mod error;
mod routes;
mod state;
mod templates;

use finsight_analysis::{AnalysisConfig, build_coordinator};
use finsight_auth::{AuthSession, HostedAuthBackend};
use finsight_llm::providers::GroqProvider;
use finsight_runtime::AgentRuntime;
use state::AppState;
use std::sync::Arc;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const SESSION_INACTIVITY_MINUTES: i64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    finsight_utils::init_tracing();

    // LLM provider and agent stack
    let provider = Arc::new(GroqProvider::from_env()?);
    let runtime = Arc::new(AgentRuntime::builder().provider(provider).build()?);
    let config = Arc::new(AnalysisConfig::default().with_env()?);
    let coordinator = Arc::new(build_coordinator(runtime, config)?);

    // Hosted auth
    let backend = HostedAuthBackend::from_env()?;
    let auth_url = backend.auth_url().to_string();
    let auth = Arc::new(AuthSession::new(Arc::new(backend), auth_url));

    let state = AppState::new(coordinator, auth);

    // In-memory session store; single-user interactive deployment
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            SESSION_INACTIVITY_MINUTES,
        )));

    let app = routes::router(state).layer(session_layer);

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Web front end listening");

    axum::serve(listener, app).await?;

    Ok(())
}
