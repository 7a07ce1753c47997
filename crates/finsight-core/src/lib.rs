//! Core abstractions for the finsight agent stack
//!
//! This crate defines the fundamental traits and types used throughout the
//! finsight workspace.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
