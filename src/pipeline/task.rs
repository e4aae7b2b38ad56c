//! Task definitions for the agent pipeline.

/// A unit of work assigned to an agent.
#[derive(Debug, Clone)]
pub struct Task {
    /// Short name used in logs and output lookup.
    pub name: String,
    /// Full instructions handed to the agent.
    pub description: String,
    /// Description of what a good final answer looks like.
    pub expected_output: String,
}

impl Task {
    /// Create a new task.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
        }
    }

    /// Render the task as the user message handed to the model.
    pub fn prompt(&self) -> String {
        format!(
            "{}\n\nExpected output: {}",
            self.description, self.expected_output
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_description_and_expectation() {
        let task = Task::new("Review", "Read the notes.", "A short verdict.");
        let prompt = task.prompt();
        assert!(prompt.starts_with("Read the notes."));
        assert!(prompt.contains("Expected output: A short verdict."));
    }
}
