//! Shared OpenAI client construction.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Configured OpenAI client type used by every API consumer in the crate.
pub type OpenAIClient = Client<OpenAIConfig>;

/// Whisper uploads carry whole audio chunks, so requests get a generous
/// five minute timeout rather than reqwest's unlimited default.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Build the process-wide OpenAI client.
///
/// The API key is read from `OPENAI_API_KEY`. Build one client at startup and
/// hand out clones; they share a single connection pool.
pub fn create_client() -> OpenAIClient {
    let http_client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("static reqwest options");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}
