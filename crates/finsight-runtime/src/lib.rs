//! Agent runtime for executing finsight agents
//!
//! This crate provides the runtime infrastructure for executing agents:
//! the AgentExecutor for LLM ⇄ tool loops, AgentRuntime for dependency
//! management, and the concrete agent implementations (tool-using agents
//! and the coordinating team agent).

pub mod agents;
pub mod executor;
pub mod runtime;

// Re-export key types
pub use agents::{TeamAgent, TeamAgentBuilder, ToolAgent};
pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
