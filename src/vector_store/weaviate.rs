//! Weaviate insight store implementation.
//!
//! Talks to a hosted Weaviate cluster over its REST and GraphQL APIs. The
//! collection is configured with the `text2vec-openai` vectorizer, so the
//! cluster embeds inserted objects and query text itself; this client never
//! computes vectors locally. The OpenAI key is forwarded per-request via the
//! `X-OpenAI-Api-Key` header, which is how Weaviate proxies embedding calls.

use super::{Insight, InsightStore};
use crate::config::WeaviateSettings;
use crate::error::{InnsiktError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Weaviate-backed insight store.
///
/// Holds a single pooled `reqwest::Client`; connections are reused across
/// requests instead of being re-established per call.
pub struct WeaviateStore {
    client: Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
    openai_api_key: Option<String>,
}

impl WeaviateStore {
    /// Create a store from configuration.
    ///
    /// Reads `OPENAI_API_KEY` from the environment for the vectorizer
    /// passthrough header.
    pub fn from_settings(settings: &WeaviateSettings) -> Result<Self> {
        settings.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.cluster_url.trim_end_matches('/').to_string(),
            collection: settings.collection.clone(),
            api_key: settings.api_key.clone(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
        })
    }

    /// Create a store pointing at an arbitrary base URL, without credentials.
    ///
    /// Used in tests against a local mock server.
    pub fn with_base_url(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            collection: collection.into(),
            api_key: None,
            openai_api_key: None,
        }
    }

    fn schema_url(&self) -> String {
        format!("{}/v1/schema/{}", self.base_url, self.collection)
    }

    fn apply_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }
        if let Some(key) = &self.openai_api_key {
            request = request.header("X-OpenAI-Api-Key", key);
        }
        request
    }

    async fn error_from_response(operation: &str, response: Response) -> InnsiktError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        InnsiktError::VectorStore(format!("{} failed with {}: {}", operation, status, body))
    }

    /// POST a GraphQL query and return the `data` payload.
    ///
    /// Weaviate returns 200 even for failed queries, with the failure under
    /// an `errors` array, so both levels are checked here.
    async fn graphql(&self, query: String) -> Result<Value> {
        let response = self
            .apply_headers(self.client.post(format!("{}/v1/graphql", self.base_url)))
            .json(&json!({ "query": query }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("GraphQL query", response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| InnsiktError::VectorStore(format!("Invalid GraphQL response: {}", e)))?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors[0]
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown GraphQL error");
                return Err(InnsiktError::VectorStore(message.to_string()));
            }
        }

        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl InsightStore for WeaviateStore {
    async fn collection_exists(&self) -> Result<bool> {
        let response = self
            .apply_headers(self.client.get(self.schema_url()))
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::error_from_response("Schema lookup", response).await),
        }
    }

    #[instrument(skip(self))]
    async fn create_collection(&self) -> Result<()> {
        let schema = json!({
            "class": self.collection,
            "properties": [
                { "name": "insight", "dataType": ["text"] }
            ],
            "vectorizer": "text2vec-openai",
        });

        let response = self
            .apply_headers(self.client.post(format!("{}/v1/schema", self.base_url)))
            .json(&schema)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("Collection creation", response).await);
        }

        debug!(collection = %self.collection, "Created collection");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_collection(&self) -> Result<()> {
        let response = self
            .apply_headers(self.client.delete(self.schema_url()))
            .send()
            .await?;

        // Deleting an absent collection is treated as success.
        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(Self::error_from_response("Collection deletion", response).await);
        }

        debug!(collection = %self.collection, "Deleted collection");
        Ok(())
    }

    #[instrument(skip(self, insights), fields(count = insights.len()))]
    async fn insert_insights(&self, insights: &[Insight]) -> Result<usize> {
        if insights.is_empty() {
            return Ok(0);
        }

        let objects: Vec<Value> = insights
            .iter()
            .map(|i| {
                json!({
                    "class": self.collection,
                    "properties": i,
                })
            })
            .collect();

        let response = self
            .apply_headers(
                self.client
                    .post(format!("{}/v1/batch/objects", self.base_url)),
            )
            .json(&json!({ "objects": objects }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("Batch insert", response).await);
        }

        // The batch endpoint reports per-object outcomes in a 200 response.
        let results: Value = response
            .json()
            .await
            .map_err(|e| InnsiktError::VectorStore(format!("Invalid batch response: {}", e)))?;

        if let Some(items) = results.as_array() {
            for item in items {
                if let Some(errors) = item.pointer("/result/errors/error") {
                    return Err(InnsiktError::VectorStore(format!(
                        "Batch insert rejected an object: {}",
                        errors
                    )));
                }
            }
        }

        Ok(insights.len())
    }

    #[instrument(skip(self))]
    async fn query_insights(&self, topic: &str, limit: usize) -> Result<Vec<Insight>> {
        // serde_json string encoding doubles as GraphQL string escaping.
        let concepts = serde_json::to_string(topic)?;
        let query = format!(
            "{{ Get {{ {class}(nearText: {{concepts: [{concepts}]}}, limit: {limit}) {{ insight }} }} }}",
            class = self.collection,
        );

        let data = self.graphql(query).await?;

        let hits = data
            .pointer(&format!("/Get/{}", self.collection))
            .and_then(Value::as_array)
            .map(|objects| {
                objects
                    .iter()
                    .filter_map(|o| o.get("insight").and_then(Value::as_str))
                    .map(Insight::new)
                    .collect()
            })
            .unwrap_or_default();

        Ok(hits)
    }

    async fn count_insights(&self) -> Result<usize> {
        let query = format!(
            "{{ Aggregate {{ {class} {{ meta {{ count }} }} }} }}",
            class = self.collection,
        );

        let data = self.graphql(query).await?;

        let count = data
            .pointer(&format!("/Aggregate/{}/0/meta/count", self.collection))
            .and_then(Value::as_u64)
            .unwrap_or(0);

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_store(server: &MockServer) -> WeaviateStore {
        WeaviateStore::with_base_url(server.uri(), "PodcastInsights")
    }

    #[test]
    fn test_with_base_url_strips_nothing() {
        let store = WeaviateStore::with_base_url("http://localhost:8080", "PodcastInsights");
        assert_eq!(store.schema_url(), "http://localhost:8080/v1/schema/PodcastInsights");
    }

    #[test]
    fn test_from_settings_requires_cluster_url() {
        let settings = WeaviateSettings::default();
        assert!(WeaviateStore::from_settings(&settings).is_err());
    }

    #[test]
    fn test_from_settings_trims_trailing_slash() {
        let settings = WeaviateSettings {
            cluster_url: "https://demo.weaviate.network/".to_string(),
            ..Default::default()
        };
        let store = WeaviateStore::from_settings(&settings).unwrap();
        assert_eq!(store.base_url, "https://demo.weaviate.network");
    }

    #[tokio::test]
    async fn test_collection_exists_true_on_200() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/schema/PodcastInsights"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "class": "PodcastInsights" })),
            )
            .mount(&server)
            .await;

        assert!(test_store(&server).collection_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_collection_exists_false_on_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/schema/PodcastInsights"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(!test_store(&server).collection_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent_when_configured() {
        let server = MockServer::start().await;

        // Only a request carrying the bearer header matches; an unauthenticated
        // request would fall through to wiremock's 404 and read as "absent".
        Mock::given(method("GET"))
            .and(path("/v1/schema/PodcastInsights"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "class": "PodcastInsights" })),
            )
            .mount(&server)
            .await;

        let settings = WeaviateSettings {
            cluster_url: server.uri(),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let store = WeaviateStore::from_settings(&settings).unwrap();

        assert!(store.collection_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_create_collection_posts_class_schema() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/schema"))
            .and(body_partial_json(serde_json::json!({
                "class": "PodcastInsights",
                "vectorizer": "text2vec-openai",
                "properties": [{ "name": "insight", "dataType": ["text"] }],
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "class": "PodcastInsights" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        test_store(&server).create_collection().await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_absent_collection_is_ok() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/schema/PodcastInsights"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(test_store(&server).delete_collection().await.is_ok());
    }

    #[tokio::test]
    async fn test_insert_insights_batches_objects() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/batch/objects"))
            .and(body_partial_json(serde_json::json!({
                "objects": [{
                    "class": "PodcastInsights",
                    "properties": { "insight": "Risk-taking and embracing failure is key to entrepreneurship." },
                }],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "class": "PodcastInsights", "result": { "status": "SUCCESS" } },
                { "class": "PodcastInsights", "result": { "status": "SUCCESS" } },
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let inserted = test_store(&server)
            .insert_insights(&[
                Insight::new("Risk-taking and embracing failure is key to entrepreneurship."),
                Insight::new("Niche online bookstores can build loyal customer bases."),
            ])
            .await
            .unwrap();

        assert_eq!(inserted, 2);
    }

    #[tokio::test]
    async fn test_insert_insights_reports_object_errors() {
        let server = MockServer::start().await;

        // The batch endpoint answers 200 with per-object outcomes.
        Mock::given(method("POST"))
            .and(path("/v1/batch/objects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "result": { "errors": { "error": [{ "message": "vectorizer exploded" }] } } },
            ])))
            .mount(&server)
            .await;

        let result = test_store(&server)
            .insert_insights(&[Insight::new("doomed")])
            .await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("vectorizer exploded"));
    }

    #[tokio::test]
    async fn test_query_insights_parses_hits() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .and(body_string_contains("nearText"))
            .and(body_string_contains("growth"))
            .and(body_string_contains("limit: 3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "Get": {
                        "PodcastInsights": [
                            { "insight": "Slower, deliberate progress often yields better long-term growth." },
                            { "insight": "Pursuing a personal calling leads to long-term startup success." },
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let hits = test_store(&server).query_insights("growth", 3).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(
            hits[0].insight,
            "Slower, deliberate progress often yields better long-term growth."
        );
    }

    #[tokio::test]
    async fn test_query_insights_empty_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "Get": { "PodcastInsights": [] } }
            })))
            .mount(&server)
            .await;

        let hits = test_store(&server).query_insights("synergy", 3).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_query_insights_surfaces_graphql_errors() {
        let server = MockServer::start().await;

        // Weaviate reports query failures inside a 200 response.
        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [{ "message": "no such class: PodcastInsights" }]
            })))
            .mount(&server)
            .await;

        let err = test_store(&server)
            .query_insights("growth", 3)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("no such class"));
    }

    #[tokio::test]
    async fn test_query_insights_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .respond_with(ResponseTemplate::new(500).set_body_string("cluster on fire"))
            .mount(&server)
            .await;

        let err = test_store(&server)
            .query_insights("growth", 3)
            .await
            .unwrap_err();

        assert!(matches!(err, InnsiktError::VectorStore(_)));
    }

    #[tokio::test]
    async fn test_count_insights_reads_aggregate_count() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .and(body_string_contains("Aggregate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "Aggregate": { "PodcastInsights": [{ "meta": { "count": 5 } }] }
                }
            })))
            .mount(&server)
            .await;

        assert_eq!(test_store(&server).count_insights().await.unwrap(), 5);
    }
}
