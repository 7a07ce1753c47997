//! Askama template definitions for the web front end

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// The authenticated user shown in the page header
///
/// Also the payload stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    pub email: String,
}

/// A one-shot status message rendered above the query box
#[derive(Debug, Clone)]
pub struct FlashMessage {
    /// "info" or "error"; selects the style
    pub kind: &'static str,
    pub text: String,
}

impl FlashMessage {
    /// Informational message
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: "info",
            text: text.into(),
        }
    }

    /// Error message
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: "error",
            text: text.into(),
        }
    }
}

/// The single page of the application
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Logged-in user, if any; None renders the logged-out view
    pub current_user: Option<CurrentUser>,
    /// Link to the provider-hosted account page
    pub account_url: String,
    /// Status message to display
    pub message: Option<FlashMessage>,
    /// Rendered report HTML (already markdown-converted)
    pub report_html: Option<String>,
    /// Query echoed back into the text box
    pub query: String,
}

impl IndexTemplate {
    /// The logged-out view
    pub fn logged_out(account_url: String, message: Option<FlashMessage>) -> Self {
        Self {
            current_user: None,
            account_url,
            message,
            report_html: None,
            query: String::new(),
        }
    }

    /// The logged-in view without a report
    pub fn logged_in(user: CurrentUser, account_url: String) -> Self {
        Self {
            current_user: Some(user),
            account_url,
            message: None,
            report_html: None,
            query: String::new(),
        }
    }
}

/// Wrapper that renders an askama template into an axum response
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {err}"),
            )
                .into_response(),
        }
    }
}
