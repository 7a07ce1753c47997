//! Tool framework for finsight agents
//!
//! Defines the `Tool` trait implemented by every capability an agent can
//! invoke (web search, market data, metric lookup) and the registry used by
//! the executor to resolve tool calls.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
