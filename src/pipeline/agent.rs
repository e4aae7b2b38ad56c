//! A single LLM agent and its tool-calling conversation loop.

use super::task::Task;
use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use crate::error::{InnsiktError, Result};
use crate::openai::OpenAIClient;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use tracing::{debug, info, instrument};

const DEFAULT_MAX_ITERATIONS: usize = 8;

/// An LLM persona defined by a role, a goal, and a backstory, optionally
/// holding tools it may call while working.
///
/// Agents borrow the process-wide OpenAI client at construction, so building
/// one per run is free.
pub struct Agent {
    client: OpenAIClient,
    role: String,
    goal: String,
    backstory: String,
    model: String,
    tools: Option<ToolContext>,
    max_iterations: usize,
}

impl Agent {
    /// An agent without tools. Add them with [`Agent::with_tools`].
    pub fn new(
        client: OpenAIClient,
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            model: model.into(),
            tools: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_tools(mut self, tools: ToolContext) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Cap on conversation round trips before the run is abandoned.
    pub fn with_max_iterations(mut self, cap: usize) -> Self {
        self.max_iterations = cap;
        self
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are {role}. {backstory}\n\nYour goal: {goal}",
            role = self.role,
            backstory = self.backstory,
            goal = self.goal,
        )
    }

    /// Converse with the model until it answers without requesting a tool.
    ///
    /// `context` carries the output of earlier tasks and lands ahead of the
    /// task prompt in the opening user message. Tool requests are served
    /// between rounds and their results appended to the conversation, capped
    /// at `max_iterations` rounds.
    #[instrument(skip_all, fields(agent = %self.role, task = %task.name))]
    pub async fn execute(&self, task: &Task, context: Option<&str>) -> Result<AgentOutput> {
        let opening = match context {
            Some(earlier) => format!("Context: {}\n\nTask: {}", earlier, task.prompt()),
            None => task.prompt(),
        };

        let mut conversation: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt())
                .build()
                .map_err(|e| InnsiktError::Pipeline(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(opening)
                .build()
                .map_err(|e| InnsiktError::Pipeline(e.to_string()))?
                .into(),
        ];

        let mut call_log = Vec::new();
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(InnsiktError::Pipeline(format!(
                    "Agent '{}' exceeded maximum iterations ({})",
                    self.role, self.max_iterations
                )));
            }
            debug!("Round {} of at most {}", iterations, self.max_iterations);

            let mut builder = CreateChatCompletionRequestArgs::default();
            builder.model(&self.model).messages(conversation.clone());
            if self.tools.is_some() {
                builder.tools(tool_definitions());
            }
            let request = builder
                .build()
                .map_err(|e| InnsiktError::Pipeline(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| InnsiktError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| InnsiktError::Pipeline("No response from model".to_string()))?;

            let (requested, tools) = match (&choice.message.tool_calls, &self.tools) {
                (Some(calls), Some(tools)) if !calls.is_empty() => (calls.clone(), tools),
                _ => {
                    // A plain answer ends the conversation
                    return Ok(AgentOutput {
                        content: choice.message.content.clone().unwrap_or_default(),
                        tool_calls: call_log,
                        iterations,
                    });
                }
            };

            // The wire format requires the assistant turn carrying the tool
            // requests to precede the tool results
            conversation.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(requested.clone())
                    .build()
                    .map_err(|e| InnsiktError::Pipeline(e.to_string()))?
                    .into(),
            );

            for call in &requested {
                let entry = Self::serve_tool_call(tools, call).await;

                conversation.push(
                    ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&call.id)
                        .content(entry.result.clone())
                        .build()
                        .map_err(|e| InnsiktError::Pipeline(e.to_string()))?
                        .into(),
                );
                call_log.push(entry);
            }
        }
    }

    /// Serve one tool request and record the exchange.
    ///
    /// A malformed request becomes a tool result the model can read and
    /// correct, costing one round instead of the whole task.
    async fn serve_tool_call(
        tools: &ToolContext,
        call: &ChatCompletionMessageToolCall,
    ) -> ToolCallRecord {
        let name = &call.function.name;
        let arguments = &call.function.arguments;
        info!(tool = %name, args = %arguments, "Serving tool call");

        let result = match parse_tool_call(name, arguments) {
            Ok(request) => tools.execute(&request).await,
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// What one task execution produced.
#[derive(Debug)]
pub struct AgentOutput {
    /// The model's final answer.
    pub content: String,
    /// Every tool exchange that happened along the way.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Conversation rounds spent, including the final one.
    pub iterations: usize,
}

/// One served tool call: what was asked and what came back.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    pub name: String,
    /// Raw JSON argument payload as the model sent it.
    pub arguments: String,
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::create_client;

    #[test]
    fn test_record_renders_as_a_call() {
        let entry = ToolCallRecord {
            name: "search_insights".to_string(),
            arguments: r#"{"topic": "funding"}"#.to_string(),
            result: "💡 something".to_string(),
        };

        assert_eq!(entry.to_string(), r#"search_insights({"topic": "funding"})"#);
    }

    #[test]
    fn test_system_prompt_contains_identity() {
        let agent = Agent::new(
            create_client(),
            "Insight Extractor",
            "Find the insights.",
            "An analyst.",
            "gpt-4o-mini",
        );

        let prompt = agent.system_prompt();
        assert!(prompt.starts_with("You are Insight Extractor."));
        assert!(prompt.contains("Your goal: Find the insights."));
    }
}
