//! In-memory insight store implementation.
//!
//! Useful for testing the pipeline without a live Weaviate cluster. Queries
//! do naive substring matching instead of vector similarity, which is enough
//! to exercise the tool loop and the degradation paths.

use super::{Insight, InsightStore};
use crate::error::{InnsiktError, Result};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory insight store.
pub struct MemoryInsightStore {
    state: RwLock<State>,
}

struct State {
    exists: bool,
    insights: Vec<Insight>,
    fail_queries: bool,
}

impl MemoryInsightStore {
    /// Create a new empty store with no collection.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                exists: false,
                insights: Vec::new(),
                fail_queries: false,
            }),
        }
    }

    /// Create a store whose collection already holds the given insights.
    pub fn with_insights(insights: Vec<Insight>) -> Self {
        Self {
            state: RwLock::new(State {
                exists: true,
                insights,
                fail_queries: false,
            }),
        }
    }

    /// Make every subsequent query return an error.
    pub fn fail_queries(&self) {
        self.state.write().unwrap().fail_queries = true;
    }
}

impl Default for MemoryInsightStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InsightStore for MemoryInsightStore {
    async fn collection_exists(&self) -> Result<bool> {
        Ok(self.state.read().unwrap().exists)
    }

    async fn create_collection(&self) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.exists = true;
        Ok(())
    }

    async fn delete_collection(&self) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.exists = false;
        state.insights.clear();
        Ok(())
    }

    async fn insert_insights(&self, insights: &[Insight]) -> Result<usize> {
        let mut state = self.state.write().unwrap();
        if !state.exists {
            return Err(InnsiktError::VectorStore(
                "Collection does not exist".to_string(),
            ));
        }
        state.insights.extend_from_slice(insights);
        Ok(insights.len())
    }

    async fn query_insights(&self, topic: &str, limit: usize) -> Result<Vec<Insight>> {
        let state = self.state.read().unwrap();
        if state.fail_queries {
            return Err(InnsiktError::VectorStore(
                "Simulated query failure".to_string(),
            ));
        }

        let topic_lower = topic.to_lowercase();
        let matches: Vec<Insight> = state
            .insights
            .iter()
            .filter(|i| i.insight.to_lowercase().contains(&topic_lower))
            .take(limit)
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn count_insights(&self) -> Result<usize> {
        Ok(self.state.read().unwrap().insights.len())
    }
}
