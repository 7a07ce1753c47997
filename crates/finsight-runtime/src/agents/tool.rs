//! Tool agent implementation (wraps AgentExecutor)

use crate::executor::AgentExecutor;
use async_trait::async_trait;
use finsight_core::{Agent, Context, Result};

/// An agent that uses the LLM loop with tool execution
///
/// ToolAgent wraps the AgentExecutor to provide the Agent trait interface
/// while supporting tool execution in an LLM loop. It's suitable for:
/// - Agents that need to use tools to accomplish tasks
/// - Multi-step reasoning with external actions
///
/// # Example
///
/// ```no_run
/// use finsight_runtime::{AgentRuntime, ExecutorConfig};
/// use finsight_core::{Agent, Context};
/// use std::sync::Arc;
///
/// # async fn example(provider: Arc<dyn finsight_llm::LLMProvider>) -> finsight_core::Result<()> {
/// let runtime = AgentRuntime::builder().provider(provider).build()?;
///
/// let agent = runtime.create_tool_agent(ExecutorConfig::default(), "news-search");
///
/// let mut context = Context::new();
/// let response = agent
///     .process("Latest news about Infosys".to_string(), &mut context)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ToolAgent {
    executor: AgentExecutor,
    name: String,
}

impl ToolAgent {
    /// Create a new tool agent
    ///
    /// # Arguments
    ///
    /// * `executor` - The agent executor to wrap
    /// * `name` - Name of the agent
    pub fn new(executor: AgentExecutor, name: String) -> Self {
        Self { executor, name }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }
}

#[async_trait]
impl Agent for ToolAgent {
    async fn process(&self, input: String, _context: &mut Context) -> Result<String> {
        // Delegate to the executor's run method
        self.executor.run(input).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
