//! Two-agent pipeline for turning podcast transcripts into startup insights.
//!
//! The pipeline runs tasks sequentially: an extraction agent reads the
//! transcript excerpt and produces categorized insights, then a
//! recommendation agent uses a semantic-search tool to suggest related
//! resources. Each task sees the outputs of the tasks before it as context.

mod agent;
mod podcast;
mod task;
mod tools;

pub use agent::{Agent, AgentOutput, ToolCallRecord};
pub use podcast::{
    insight_extraction_task, insight_extractor_agent, podcast_pipeline,
    resource_recommendation_task, resource_recommender_agent,
};
pub use task::Task;
pub use tools::{parse_tool_call, tool_definitions, InsightSearchRequest, ToolContext};

use crate::error::Result;
use tracing::info;

/// Output of a single completed task.
#[derive(Debug, Clone)]
pub struct TaskOutput {
    /// Name of the task that produced this output.
    pub task_name: String,
    /// The agent's final answer for the task.
    pub content: String,
    /// Record of tool calls made while working on the task.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model round trips used.
    pub iterations: usize,
}

/// Result of a full pipeline run, with per-task outputs retained in order.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub outputs: Vec<TaskOutput>,
}

impl PipelineRun {
    /// Output of the last task, which is the pipeline's overall result.
    pub fn final_output(&self) -> &str {
        self.outputs
            .last()
            .map(|o| o.content.as_str())
            .unwrap_or_default()
    }

    /// Look up a task's output by task name.
    pub fn output_of(&self, task_name: &str) -> Option<&TaskOutput> {
        self.outputs.iter().find(|o| o.task_name == task_name)
    }
}

/// A sequential pipeline of (agent, task) steps.
pub struct Pipeline {
    steps: Vec<(Agent, Task)>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step. Steps run in insertion order.
    pub fn add_step(mut self, agent: Agent, task: Task) -> Self {
        self.steps.push((agent, task));
        self
    }

    /// Run all steps in order.
    ///
    /// Later tasks receive the accumulated outputs of earlier tasks as
    /// context. The first task failure aborts the run.
    pub async fn run(&self) -> Result<PipelineRun> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.steps.len());

        for (agent, task) in &self.steps {
            info!(task = %task.name, "Running pipeline task");

            let context = if outputs.is_empty() {
                None
            } else {
                Some(
                    outputs
                        .iter()
                        .map(|o| format!("[{}]\n{}", o.task_name, o.content))
                        .collect::<Vec<_>>()
                        .join("\n\n"),
                )
            };

            let result = agent.execute(task, context.as_deref()).await?;

            outputs.push(TaskOutput {
                task_name: task.name.clone(),
                content: result.content,
                tool_calls: result.tool_calls,
                iterations: result.iterations,
            });
        }

        Ok(PipelineRun { outputs })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
