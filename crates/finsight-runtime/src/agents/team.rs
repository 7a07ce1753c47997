//! Team agent implementation (coordinates member agents)
//!
//! A TeamAgent exposes each member agent to the coordinating model as a
//! delegation tool. The model decides which members to involve, the results
//! are fed back as tool results, and the model synthesizes the final answer.

use async_trait::async_trait;
use finsight_core::{Agent, Context, Error, Result};
use finsight_llm::{
    CompletionRequest, ContentBlock, LLMProvider, Message, StopReason, ToolDefinition,
    tools::schema,
};
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::executor::ExecutorConfig;
use crate::runtime::AgentRuntime;

const DELEGATE_PREFIX: &str = "delegate_to_";

/// A member of a team: an agent plus the role description shown to the
/// coordinating model.
struct TeamMember {
    key: String,
    description: String,
    agent: Arc<dyn Agent>,
}

/// An agent that coordinates a team of member agents
///
/// The coordinating model sees one `delegate_to_<member>` tool per member.
/// Delegations requested in a single assistant turn run concurrently; their
/// results come back as tool results and the loop continues until the model
/// produces its synthesized answer.
///
/// # Example
///
/// ```no_run
/// use finsight_runtime::{AgentRuntime, TeamAgent};
/// use finsight_core::{Agent, Context};
/// use std::sync::Arc;
///
/// # async fn example(
/// #     runtime: Arc<AgentRuntime>,
/// #     news_agent: Arc<dyn Agent>,
/// #     data_agent: Arc<dyn Agent>,
/// # ) -> finsight_core::Result<()> {
/// let team = TeamAgent::builder(runtime, "coordinator")
///     .add_member("news-search", "news and sentiment researcher", news_agent)
///     .add_member("financial-data", "financial data analyst", data_agent)
///     .build()?;
///
/// let mut context = Context::new();
/// let report = team
///     .process("Compare TCS and Infosys".to_string(), &mut context)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct TeamAgent {
    provider: Arc<dyn LLMProvider>,
    members: Vec<TeamMember>,
    by_tool_name: HashMap<String, usize>,
    config: ExecutorConfig,
    name: String,
}

impl TeamAgent {
    /// Create a new builder for a team agent
    ///
    /// # Arguments
    ///
    /// * `runtime` - The runtime providing the coordinating LLM
    /// * `name` - Name of the team agent
    pub fn builder(runtime: Arc<AgentRuntime>, name: impl Into<String>) -> TeamAgentBuilder {
        TeamAgentBuilder::new(runtime, name)
    }

    /// Get the number of team members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Get the list of member keys
    pub fn member_keys(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.key.as_str()).collect()
    }

    /// Build the delegation tool definitions shown to the coordinating model
    fn delegation_tools(&self) -> Vec<ToolDefinition> {
        self.members
            .iter()
            .map(|member| {
                ToolDefinition::new(
                    format!("{DELEGATE_PREFIX}{}", member.key),
                    format!(
                        "Delegate a sub-task to the {} ({}). \
                         Returns the member's full answer as text.",
                        member.key, member.description
                    ),
                    schema::object(
                        serde_json::json!({
                            "task": schema::string(
                                "The sub-task to hand to this member, phrased as a \
                                 complete instruction"
                            ),
                        }),
                        vec!["task"],
                    ),
                )
            })
            .collect()
    }

    /// Execute all delegations requested in one assistant turn
    ///
    /// Delegations run concurrently; each member receives its own clone of
    /// the execution context.
    async fn execute_delegations(
        &self,
        message: &Message,
        context: &Context,
    ) -> Vec<Message> {
        let mut pending = Vec::new();

        for tool_use in message.tool_uses() {
            if let ContentBlock::ToolUse { id, name, input } = tool_use {
                match self.by_tool_name.get(name) {
                    Some(&idx) => {
                        let member = &self.members[idx];
                        let task = extract_task(input);
                        info!(
                            member = %member.key,
                            tool_id = %id,
                            task_preview = %task.chars().take(200).collect::<String>(),
                            "Delegating sub-task"
                        );
                        pending.push((id.clone(), Some((idx, task))));
                    }
                    None => {
                        warn!(tool_name = %name, "Coordinator requested unknown member");
                        pending.push((id.clone(), None));
                    }
                }
            }
        }

        let futures = pending.iter().map(|(_, target)| async {
            match target {
                Some((idx, task)) => {
                    let member = &self.members[*idx];
                    let mut member_context = context.clone();
                    member.agent.process(task.clone(), &mut member_context).await
                }
                None => Err(Error::DelegationFailed("unknown team member".to_string())),
            }
        });

        let outcomes = join_all(futures).await;

        pending
            .into_iter()
            .zip(outcomes)
            .map(|((id, _), outcome)| match outcome {
                Ok(result) => Message::tool_result(id, result),
                Err(e) => Message::tool_error(id, format!("Error: {e}")),
            })
            .collect()
    }

    /// Run the coordination loop for one user query
    async fn coordinate(&self, input: String, context: &Context) -> Result<String> {
        let mut conversation = vec![Message::user(input)];
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > self.config.max_iterations {
                warn!(
                    "Max iterations ({}) reached, stopping",
                    self.config.max_iterations
                );
                return Ok("Max iterations reached without completion".to_string());
            }

            info!(
                iteration = iteration,
                members = self.members.len(),
                "Coordinator iteration started"
            );

            let request = CompletionRequest::builder(&self.config.model)
                .messages(conversation.clone())
                .system(
                    self.config
                        .system_prompt
                        .clone()
                        .unwrap_or_else(|| "You are a coordinator.".to_string()),
                )
                .max_tokens(self.config.max_tokens)
                .temperature(self.config.temperature.unwrap_or(0.7))
                .tools(self.delegation_tools())
                .build();

            let response = self
                .provider
                .complete(request)
                .await
                .map_err(|e| Error::ProcessingFailed(e.to_string()))?;

            conversation.push(response.message.clone());

            match response.stop_reason {
                StopReason::EndTurn => {
                    let text = response.message.text().unwrap_or("No response").to_string();
                    info!(
                        iteration = iteration,
                        response_length = text.len(),
                        "Coordinator completed"
                    );
                    return Ok(text);
                }

                StopReason::ToolUse => {
                    let results = self.execute_delegations(&response.message, context).await;

                    if results.is_empty() {
                        warn!("No delegation results despite ToolUse stop reason");
                        return Err(Error::DelegationFailed(
                            "coordinator requested tool use but no delegations ran".to_string(),
                        ));
                    }

                    info!(
                        result_count = results.len(),
                        "Delegations completed, continuing coordination loop"
                    );
                    conversation.extend(results);
                }

                StopReason::MaxTokens => {
                    warn!("Hit max tokens in coordinator response");
                    return Ok("Response truncated due to token limit".to_string());
                }

                StopReason::StopSequence => {
                    debug!("Stop sequence encountered");
                    return Ok(response.message.text().unwrap_or("No response").to_string());
                }
            }
        }
    }
}

/// Pull the `task` string out of a delegation tool input
fn extract_task(input: &Value) -> String {
    input
        .get("task")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| input.to_string())
}

#[async_trait]
impl Agent for TeamAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.coordinate(input, context).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for TeamAgent
pub struct TeamAgentBuilder {
    runtime: Arc<AgentRuntime>,
    members: Vec<TeamMember>,
    config: ExecutorConfig,
    name: String,
}

impl TeamAgentBuilder {
    /// Create a new builder
    pub fn new(runtime: Arc<AgentRuntime>, name: impl Into<String>) -> Self {
        Self {
            runtime,
            members: Vec::new(),
            config: ExecutorConfig::default(),
            name: name.into(),
        }
    }

    /// Add a team member
    ///
    /// # Arguments
    ///
    /// * `key` - The key used in the delegation tool name (`delegate_to_<key>`)
    /// * `description` - Role description shown to the coordinating model
    /// * `agent` - The member agent
    pub fn add_member(
        mut self,
        key: impl Into<String>,
        description: impl Into<String>,
        agent: Arc<dyn Agent>,
    ) -> Self {
        self.members.push(TeamMember {
            key: key.into(),
            description: description.into(),
            agent,
        });
        self
    }

    /// Set the executor configuration for the coordinating model
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the team agent
    ///
    /// # Errors
    ///
    /// Returns an error if no members were added.
    pub fn build(self) -> Result<TeamAgent> {
        if self.members.is_empty() {
            return Err(Error::InitializationFailed(
                "No team members added".to_string(),
            ));
        }

        let by_tool_name = self
            .members
            .iter()
            .enumerate()
            .map(|(idx, m)| (format!("{DELEGATE_PREFIX}{}", m.key), idx))
            .collect();

        Ok(TeamAgent {
            provider: self.runtime.provider().clone(),
            members: self.members,
            by_tool_name,
            config: self.config,
            name: self.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsight_llm::{CompletionResponse, MessageContent, Role, TokenUsage};
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedProvider {
        responses: Mutex<Vec<CompletionResponse>>,
    }

    impl ScriptedProvider {
        fn new(mut responses: Vec<CompletionResponse>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> finsight_llm::Result<CompletionResponse> {
            let mut responses = self.responses.lock().expect("scripted responses poisoned");
            responses
                .pop()
                .ok_or_else(|| finsight_llm::LLMError::RequestFailed("script exhausted".into()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Member agent that records the tasks it receives
    struct RecordingAgent {
        name: String,
        tasks: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Agent for RecordingAgent {
        async fn process(&self, input: String, _context: &mut Context) -> Result<String> {
            self.tasks
                .lock()
                .expect("task log poisoned")
                .push(input.clone());
            Ok(format!("{}: done ({input})", self.name))
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 10,
            },
        }
    }

    fn delegation_response(calls: Vec<(&str, &str, &str)>) -> CompletionResponse {
        let blocks = calls
            .into_iter()
            .map(|(id, tool, task)| ContentBlock::ToolUse {
                id: id.to_string(),
                name: tool.to_string(),
                input: json!({"task": task}),
            })
            .collect();

        CompletionResponse {
            message: Message {
                role: Role::Assistant,
                content: Some(MessageContent::Blocks(blocks)),
            },
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 10,
            },
        }
    }

    fn runtime_with(provider: Arc<dyn LLMProvider>) -> Arc<AgentRuntime> {
        Arc::new(
            AgentRuntime::builder()
                .provider(provider)
                .build()
                .expect("runtime build"),
        )
    }

    #[test]
    fn test_builder_requires_members() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let runtime = runtime_with(provider);

        let result = TeamAgent::builder(runtime, "coordinator").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_member_keys() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let runtime = runtime_with(provider);
        let tasks = Arc::new(Mutex::new(Vec::new()));

        let team = TeamAgent::builder(runtime, "coordinator")
            .add_member(
                "news-search",
                "news researcher",
                Arc::new(RecordingAgent {
                    name: "news".into(),
                    tasks: tasks.clone(),
                }),
            )
            .add_member(
                "financial-data",
                "data analyst",
                Arc::new(RecordingAgent {
                    name: "data".into(),
                    tasks,
                }),
            )
            .build()
            .unwrap();

        assert_eq!(team.member_count(), 2);
        assert_eq!(team.member_keys(), vec!["news-search", "financial-data"]);

        let tools = team.delegation_tools();
        assert_eq!(tools[0].name, "delegate_to_news-search");
        assert_eq!(tools[1].name, "delegate_to_financial-data");
    }

    #[tokio::test]
    async fn test_delegation_roundtrip() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            delegation_response(vec![
                ("call_1", "delegate_to_news-search", "Find Infosys news"),
                ("call_2", "delegate_to_financial-data", "Fetch Infosys metrics"),
            ]),
            text_response("# Report\nInfosys looks stable."),
        ]));
        let runtime = runtime_with(provider);

        let news_tasks = Arc::new(Mutex::new(Vec::new()));
        let data_tasks = Arc::new(Mutex::new(Vec::new()));

        let team = TeamAgent::builder(runtime, "coordinator")
            .add_member(
                "news-search",
                "news researcher",
                Arc::new(RecordingAgent {
                    name: "news".into(),
                    tasks: news_tasks.clone(),
                }),
            )
            .add_member(
                "financial-data",
                "data analyst",
                Arc::new(RecordingAgent {
                    name: "data".into(),
                    tasks: data_tasks.clone(),
                }),
            )
            .build()
            .unwrap();

        let mut context = Context::new();
        let report = team
            .process("Analyze Infosys".to_string(), &mut context)
            .await
            .unwrap();

        assert!(report.contains("Infosys looks stable"));
        assert_eq!(
            *news_tasks.lock().unwrap(),
            vec!["Find Infosys news".to_string()]
        );
        assert_eq!(
            *data_tasks.lock().unwrap(),
            vec!["Fetch Infosys metrics".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_member_becomes_tool_error() {
        // First turn delegates to a member that does not exist; the error is
        // fed back and the model recovers with a final answer.
        let provider = Arc::new(ScriptedProvider::new(vec![
            delegation_response(vec![("call_1", "delegate_to_ghost", "do something")]),
            text_response("Recovered without the ghost member."),
        ]));
        let runtime = runtime_with(provider);
        let tasks = Arc::new(Mutex::new(Vec::new()));

        let team = TeamAgent::builder(runtime, "coordinator")
            .add_member(
                "news-search",
                "news researcher",
                Arc::new(RecordingAgent {
                    name: "news".into(),
                    tasks: tasks.clone(),
                }),
            )
            .build()
            .unwrap();

        let mut context = Context::new();
        let report = team
            .process("Analyze TCS".to_string(), &mut context)
            .await
            .unwrap();

        assert!(report.contains("Recovered"));
        assert!(tasks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_max_iterations_guard() {
        let responses: Vec<_> = (0..4)
            .map(|_| delegation_response(vec![("call_1", "delegate_to_news-search", "again")]))
            .collect();
        let provider = Arc::new(ScriptedProvider::new(responses));
        let runtime = runtime_with(provider);
        let tasks = Arc::new(Mutex::new(Vec::new()));

        let team = TeamAgent::builder(runtime, "coordinator")
            .add_member(
                "news-search",
                "news researcher",
                Arc::new(RecordingAgent {
                    name: "news".into(),
                    tasks,
                }),
            )
            .config(ExecutorConfig {
                max_iterations: 3,
                ..ExecutorConfig::default()
            })
            .build()
            .unwrap();

        let mut context = Context::new();
        let report = team
            .process("loop forever".to_string(), &mut context)
            .await
            .unwrap();
        assert!(report.contains("Max iterations"));
    }

    #[test]
    fn test_extract_task() {
        assert_eq!(extract_task(&json!({"task": "do it"})), "do it");
        // Missing task falls back to the raw input
        assert_eq!(extract_task(&json!({"other": 1})), r#"{"other":1}"#);
    }
}
