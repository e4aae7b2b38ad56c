//! The podcast analysis pipeline: agents, tasks, and wiring.

use super::agent::Agent;
use super::task::Task;
use super::tools::ToolContext;
use super::Pipeline;
use crate::config::PipelineSettings;
use crate::openai::OpenAIClient;
use crate::vector_store::InsightStore;
use std::sync::Arc;

/// Agent that reads the transcript and pulls out entrepreneurial insights.
pub fn insight_extractor_agent(client: OpenAIClient, model: &str) -> Agent {
    Agent::new(
        client,
        "Insight Extractor",
        "Extract startup ideas, trends, actionable insights, and investor mentions from the podcast transcript.",
        "An AI agent skilled in analyzing podcast transcripts to identify key entrepreneurial insights.",
        model,
    )
}

/// Agent that suggests further resources, backed by the insights search tool.
pub fn resource_recommender_agent(client: OpenAIClient, model: &str, tools: ToolContext) -> Agent {
    Agent::new(
        client,
        "Resource Recommender",
        "Provide additional resources based on extracted insights.",
        "An AI agent proficient in recommending relevant resources using semantic search.",
        model,
    )
    .with_tools(tools)
}

/// Task handed to the extraction agent.
///
/// The excerpt is embedded verbatim; callers decide how much of the
/// transcript to include.
pub fn insight_extraction_task(transcript_excerpt: &str) -> Task {
    Task::new(
        "Insight Extraction",
        format!(
            "Analyze the following transcript and identify startup ideas, trends, actionable insights, and investor mentions:\n\n{}",
            transcript_excerpt
        ),
        "A structured summary with categorized insights.",
    )
}

/// Task handed to the recommendation agent.
pub fn resource_recommendation_task() -> Task {
    Task::new(
        "Resource Recommendation",
        "Use the Weaviate tool to find resources related to the extracted insights.",
        "A list of recommended resources with brief descriptions.",
    )
}

/// Assemble the full two-step pipeline for one transcript excerpt.
pub fn podcast_pipeline(
    client: OpenAIClient,
    store: Arc<dyn InsightStore>,
    transcript_excerpt: &str,
    settings: &PipelineSettings,
    query_limit: usize,
) -> Pipeline {
    let extractor = insight_extractor_agent(client.clone(), &settings.model)
        .with_max_iterations(settings.max_tool_iterations);

    let recommender = resource_recommender_agent(
        client,
        &settings.model,
        ToolContext::new(store, query_limit),
    )
    .with_max_iterations(settings.max_tool_iterations);

    Pipeline::new()
        .add_step(extractor, insight_extraction_task(transcript_excerpt))
        .add_step(recommender, resource_recommendation_task())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::create_client;

    #[test]
    fn test_agent_roles() {
        let client = create_client();
        let extractor = insight_extractor_agent(client.clone(), "gpt-4o-mini");
        assert_eq!(extractor.role(), "Insight Extractor");

        let store = Arc::new(crate::vector_store::MemoryInsightStore::new());
        let recommender =
            resource_recommender_agent(client, "gpt-4o-mini", ToolContext::new(store, 3));
        assert_eq!(recommender.role(), "Resource Recommender");
    }

    #[test]
    fn test_extraction_task_embeds_excerpt_verbatim() {
        let excerpt = "People start companies for strange reasons. Capital is a tool.";
        let task = insight_extraction_task(excerpt);

        assert_eq!(task.name, "Insight Extraction");
        assert!(task.description.starts_with("Analyze the following transcript"));
        assert!(task.description.ends_with(excerpt));
        assert_eq!(
            task.expected_output,
            "A structured summary with categorized insights."
        );
    }

    #[test]
    fn test_recommendation_task_texts() {
        let task = resource_recommendation_task();
        assert_eq!(task.name, "Resource Recommendation");
        assert_eq!(
            task.description,
            "Use the Weaviate tool to find resources related to the extracted insights."
        );
        assert_eq!(
            task.expected_output,
            "A list of recommended resources with brief descriptions."
        );
    }

    #[test]
    fn test_long_transcript_embeds_exactly_the_cutoff_prefix() {
        use crate::transcription::{Transcript, TranscriptSegment};

        let transcript = Transcript::new(vec![TranscriptSegment::new(0.0, 1.0, "a".repeat(5000))]);
        let excerpt = transcript.clipped_text(3000);
        let task = insight_extraction_task(&excerpt);

        let (_, embedded) = task.description.split_once("\n\n").unwrap();
        assert_eq!(embedded.chars().count(), 3000);
    }
}
