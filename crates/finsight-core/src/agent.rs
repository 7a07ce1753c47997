//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// Note: the Agent trait does not use Message directly. The Message type
/// lives in finsight-llm as it is LLM-specific. Concrete agent
/// implementations use finsight_llm::Message when talking to providers.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    ///
    /// The input/output types are intentionally kept as String for maximum
    /// flexibility. Concrete implementations can parse/format as needed.
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;

    /// Initialize the agent (optional)
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Shutdown the agent (optional)
    async fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
