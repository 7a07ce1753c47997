//! Shared utilities for the finsight workspace

pub mod logging;

pub use logging::init_tracing;
