//! Tool definitions and implementations for the agent pipeline.

use crate::error::{InnsiktError, Result};
use crate::vector_store::InsightStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Typed request for the insights search tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightSearchRequest {
    /// Topic to search the insight collection for.
    pub topic: String,
}

/// Tool execution context with access to the insight store.
pub struct ToolContext {
    store: Arc<dyn InsightStore>,
    query_limit: usize,
}

impl ToolContext {
    pub fn new(store: Arc<dyn InsightStore>, query_limit: usize) -> Self {
        Self { store, query_limit }
    }

    /// Execute an insights search and render the result for the model.
    ///
    /// This never fails: store errors are folded into the returned string so
    /// the agent can finish the task without the lookup. The three shapes are
    /// one line per hit, a fixed no-results sentence, and a prefixed error
    /// message.
    pub async fn execute(&self, request: &InsightSearchRequest) -> String {
        match self
            .store
            .query_insights(&request.topic, self.query_limit)
            .await
        {
            Ok(hits) if hits.is_empty() => "No insights found in Weaviate.".to_string(),
            Ok(hits) => hits
                .iter()
                .map(|i| format!("💡 {}", i.insight))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                warn!("Insight search failed, degrading: {}", e);
                format!("❌ Error querying Weaviate: {}", e)
            }
        }
    }
}

/// OpenAI function/tool definitions advertised to the recommendation agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: "search_insights".to_string(),
            description: Some(
                "Searches Weaviate for relevant insights related to a given topic.".to_string(),
            ),
            parameters: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "The topic to search for"
                    }
                },
                "required": ["topic"]
            })),
            strict: None,
        },
    }]
}

/// Turn a raw (name, JSON arguments) pair from the model into a typed
/// request.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<InsightSearchRequest> {
    if name != "search_insights" {
        return Err(InnsiktError::Pipeline(format!("Unknown tool: {}", name)));
    }

    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| InnsiktError::Pipeline(format!("Invalid tool arguments: {}", e)))?;

    let topic = args["topic"]
        .as_str()
        .ok_or_else(|| InnsiktError::Pipeline("Missing 'topic' argument".to_string()))?
        .to_string();

    Ok(InsightSearchRequest { topic })
}
