//! Request handlers for the single-page front end

use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use finsight_analysis::{GENERIC_ERROR_MESSAGE, apply_market_qualifier};
use finsight_core::Context;
use pulldown_cmark::{Options, Parser, html};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, info, warn};

use crate::error::WebError;
use crate::state::AppState;
use crate::templates::{CurrentUser, FlashMessage, HtmlTemplate, IndexTemplate};

/// Session key holding the authenticated user
const SESSION_USER_KEY: &str = "user";

/// Message shown when the query box is submitted empty
const EMPTY_QUERY_MESSAGE: &str = "Please enter a query to get started.";

/// Create the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/analyze", post(analyze))
        .with_state(state)
}

/// Read the logged-in user from the session, if any
async fn session_user(session: &Session) -> Result<Option<CurrentUser>, WebError> {
    Ok(session.get::<CurrentUser>(SESSION_USER_KEY).await?)
}

/// Render a markdown report to HTML for the output region
fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut rendered = String::new();
    html::push_html(&mut rendered, parser);
    rendered
}

/// The single page: logged-out view or the analysis form
async fn index(State(state): State<AppState>, session: Session) -> Result<Response, WebError> {
    let page = match session_user(&session).await? {
        Some(user) => IndexTemplate::logged_in(user, state.auth.account_url()),
        None => IndexTemplate::logged_out(state.auth.account_url(), None),
    };
    Ok(HtmlTemplate(page).into_response())
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    user_id: String,
}

/// Resolve the user through the hosted auth provider and start a session
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    match state.auth.get_user(form.user_id.trim()).await {
        Ok(user) => {
            info!(user_id = %user.user_id, "User logged in");
            session
                .insert(
                    SESSION_USER_KEY,
                    CurrentUser {
                        user_id: user.user_id,
                        email: user.email,
                    },
                )
                .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            warn!(error = %e, "Login failed");
            let page = IndexTemplate::logged_out(
                state.auth.account_url(),
                Some(FlashMessage::error(GENERIC_ERROR_MESSAGE)),
            );
            Ok(HtmlTemplate(page).into_response())
        }
    }
}

/// Revoke provider sessions, clear the local session, return to the page
async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, WebError> {
    if let Some(user) = session_user(&session).await? {
        if let Err(e) = state.auth.log_out(&user.user_id).await {
            // The local session is cleared regardless
            warn!(error = %e, "Provider logout failed");
        }
    }
    session.flush().await?;
    Ok(Redirect::to("/").into_response())
}

#[derive(Debug, Deserialize)]
struct AnalyzeForm {
    query: String,
}

/// Run the coordinator for a query and render the report
async fn analyze(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AnalyzeForm>,
) -> Result<Response, WebError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let page = run_analysis(&state, user, &form.query).await;
    Ok(HtmlTemplate(page).into_response())
}

/// Produce the page for one analysis request
///
/// Any failure during report generation is logged and rendered as the one
/// generic user-facing message.
async fn run_analysis(state: &AppState, user: CurrentUser, query: &str) -> IndexTemplate {
    let account_url = state.auth.account_url();

    if query.trim().is_empty() {
        let mut page = IndexTemplate::logged_in(user, account_url);
        page.message = Some(FlashMessage::info(EMPTY_QUERY_MESSAGE));
        return page;
    }

    let mut context = Context::new()
        .with_user_id(user.user_id.clone())
        .with_market("NSE");
    let prompt = apply_market_qualifier(query);

    info!(user_id = %user.user_id, "Generating report");

    match state.coordinator.process(prompt, &mut context).await {
        Ok(report) => {
            let mut page = IndexTemplate::logged_in(user, account_url);
            page.report_html = Some(render_markdown(&report));
            page.query = query.to_string();
            page
        }
        Err(e) => {
            error!(error = %e, "Report generation failed");
            let mut page = IndexTemplate::logged_in(user, account_url);
            page.message = Some(FlashMessage::error(GENERIC_ERROR_MESSAGE));
            page.query = query.to_string();
            page
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finsight_auth::{AccessToken, AuthBackend, AuthError, AuthSession, User};
    use finsight_core::{Agent, Error, Result as CoreResult};
    use std::sync::Arc;

    /// Backend stub; these tests never reach the provider
    struct StubBackend;

    #[async_trait]
    impl AuthBackend for StubBackend {
        async fn create_access_token(
            &self,
            _user_id: &str,
            _duration_minutes: u32,
        ) -> finsight_auth::Result<AccessToken> {
            Err(AuthError::RequestFailed("stub".into()))
        }

        async fn validate_access_token(
            &self,
            _access_token: &str,
        ) -> finsight_auth::Result<User> {
            Err(AuthError::RequestFailed("stub".into()))
        }

        async fn logout_all_sessions(&self, _user_id: &str) -> finsight_auth::Result<()> {
            Ok(())
        }
    }

    struct FixedAgent {
        outcome: std::result::Result<String, String>,
    }

    #[async_trait]
    impl Agent for FixedAgent {
        async fn process(&self, _input: String, _context: &mut Context) -> CoreResult<String> {
            self.outcome
                .clone()
                .map_err(Error::ProcessingFailed)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn app_state(outcome: std::result::Result<String, String>) -> AppState {
        let auth = Arc::new(AuthSession::new(
            Arc::new(StubBackend),
            "https://auth.example.com",
        ));
        AppState::new(Arc::new(FixedAgent { outcome }), auth)
    }

    fn user() -> CurrentUser {
        CurrentUser {
            user_id: "u-1".to_string(),
            email: "trader@example.com".to_string(),
        }
    }

    #[test]
    fn test_render_markdown_tables_and_headings() {
        let rendered = render_markdown("# Report\n\n| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert!(rendered.contains("<h1>Report</h1>"));
        assert!(rendered.contains("<table>"));
    }

    #[tokio::test]
    async fn test_empty_query_shows_info_message() {
        let state = app_state(Ok("unused".to_string()));
        let page = run_analysis(&state, user(), "   ").await;

        let message = page.message.expect("expected info message");
        assert_eq!(message.kind, "info");
        assert_eq!(message.text, EMPTY_QUERY_MESSAGE);
        assert!(page.report_html.is_none());
    }

    #[tokio::test]
    async fn test_successful_report_is_rendered() {
        let state = app_state(Ok("# Comparison\nTCS leads.".to_string()));
        let page = run_analysis(&state, user(), "Compare TCS and Infosys").await;

        assert!(page.message.is_none());
        let report = page.report_html.expect("expected report");
        assert!(report.contains("<h1>Comparison</h1>"));
        assert_eq!(page.query, "Compare TCS and Infosys");
    }

    #[tokio::test]
    async fn test_failure_shows_generic_message() {
        let state = app_state(Err("provider exploded".to_string()));
        let page = run_analysis(&state, user(), "Analyze TCS").await;

        let message = page.message.expect("expected error message");
        assert_eq!(message.kind, "error");
        assert_eq!(message.text, GENERIC_ERROR_MESSAGE);
        // The underlying cause is never shown to the user
        assert!(!message.text.contains("provider exploded"));
        assert!(page.report_html.is_none());
    }
}
