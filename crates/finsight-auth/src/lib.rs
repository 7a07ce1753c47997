//! Hosted authentication wrapper for finsight
//!
//! Identity lives with a hosted auth provider; this crate only wraps its
//! backend API. The one piece of logic owned here is the access-token
//! cache: a call uses the cached token if present, and on an unauthorized
//! error it discards the token, mints a new one, and retries exactly once.

pub mod backend;
pub mod error;
pub mod session;

pub use backend::{AccessToken, AuthBackend, HostedAuthBackend, User};
pub use error::{AuthError, Result};
pub use session::AuthSession;
