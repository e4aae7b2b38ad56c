//! Setup command - provision the Weaviate insight collection.
//!
//! Drops any existing collection, recreates it, and inserts the seed
//! insights. Safe to re-run; the collection always ends up with exactly the
//! seed set.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::vector_store::{provision_collection, InsightStore, WeaviateStore, SEED_INSIGHTS};

/// Provision the insight collection from scratch.
pub async fn run_setup(settings: Settings) -> anyhow::Result<()> {
    preflight::check(preflight::Operation::Setup, &settings)?;

    Output::header("Innsikt Setup");
    println!();
    Output::kv("Cluster", &settings.weaviate.cluster_url);
    Output::kv("Collection", &settings.weaviate.collection);
    println!();

    let store = WeaviateStore::from_settings(&settings.weaviate)?;

    let spinner = Output::spinner("Provisioning collection...");
    let inserted = provision_collection(&store).await?;
    spinner.finish_and_clear();

    Output::success(&format!(
        "Collection '{}' created with {} seed insights:",
        settings.weaviate.collection, inserted
    ));
    for seed in SEED_INSIGHTS {
        Output::list_item(seed);
    }

    let total = store.count_insights().await?;
    println!();
    Output::kv("Rows in collection", &total.to_string());

    Ok(())
}
