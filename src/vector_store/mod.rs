//! Vector store abstraction for Innsikt.
//!
//! Insight records live in a hosted Weaviate collection; embeddings are
//! computed server-side by the collection's configured vectorizer. This
//! module provides the trait-based interface plus the one-time provisioning
//! operation that creates and seeds the collection.

mod memory;
mod weaviate;

pub use memory::MemoryInsightStore;
pub use weaviate::WeaviateStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A single insight record as stored in the collection.
///
/// The collection schema has exactly one property, `insight`, so this struct
/// serializes directly into the record's property map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Free-text statement of one startup-relevant observation.
    pub insight: String,
}

impl Insight {
    /// Create a new insight record.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            insight: text.into(),
        }
    }
}

impl std::fmt::Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.insight)
    }
}

/// Seed rows inserted by the one-time provisioning operation.
pub const SEED_INSIGHTS: [&str; 5] = [
    "Pursuing a personal calling leads to long-term startup success.",
    "Niche online bookstores can build loyal customer bases.",
    "Risk-taking and embracing failure is key to entrepreneurship.",
    "Jeff Bezos began with books but had a vision for everything.",
    "Slower, deliberate progress often yields better long-term growth.",
];

/// Trait for insight store implementations.
#[async_trait]
pub trait InsightStore: Send + Sync {
    /// Check whether the insight collection exists.
    async fn collection_exists(&self) -> Result<bool>;

    /// Create the insight collection with its schema and vectorizer.
    async fn create_collection(&self) -> Result<()>;

    /// Delete the insight collection and everything in it.
    async fn delete_collection(&self) -> Result<()>;

    /// Bulk-insert insight records. Returns the number inserted.
    async fn insert_insights(&self, insights: &[Insight]) -> Result<usize>;

    /// Nearest-neighbor text query returning up to `limit` matches.
    async fn query_insights(&self, topic: &str, limit: usize) -> Result<Vec<Insight>>;

    /// Total number of stored insight records.
    async fn count_insights(&self) -> Result<usize>;
}

/// Provision the insight collection from scratch.
///
/// Drops any pre-existing collection of the same name, recreates it, and
/// inserts the seed rows. Running this twice always converges on exactly the
/// seed set. Returns the number of rows inserted.
pub async fn provision_collection(store: &dyn InsightStore) -> Result<usize> {
    if store.collection_exists().await? {
        info!("Dropping existing insight collection");
        store.delete_collection().await?;
    }

    store.create_collection().await?;

    let seeds: Vec<Insight> = SEED_INSIGHTS.iter().copied().map(Insight::new).collect();
    let inserted = store.insert_insights(&seeds).await?;

    info!("Provisioned insight collection with {} seed rows", inserted);
    Ok(inserted)
}
