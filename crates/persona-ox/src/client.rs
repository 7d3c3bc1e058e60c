use std::{fmt, time::Duration};

use async_trait::async_trait;
use bon::Builder;

use crate::{
    error::CompletionError,
    internal::{ChatRequest, CompletionRequestHelper},
    message::Message,
    model::Model,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// One blocking request/response round trip to a text-generation service.
///
/// Implementations must be shareable across batch workers. The returned text
/// is trimmed of surrounding whitespace.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, conversation: &[Message]) -> Result<String, CompletionError>;
}

/// Client for OpenAI-compatible chat completion endpoints.
///
/// The credential lives on the instance; nothing is configured process-wide.
#[derive(Clone, Builder)]
pub struct CompletionClient {
    /// API key sent as a bearer token
    #[builder(into)]
    api_key: String,

    /// Base URL for the API (allows for custom endpoints)
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    base_url: String,

    /// Model every request is sent to
    #[builder(default, into)]
    model: Model,

    /// Per-request timeout
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,

    #[builder(skip = http_client(timeout))]
    http: reqwest::Client,
}

fn http_client(timeout: Duration) -> reqwest::Client {
    build_http_client(reqwest::Client::builder().timeout(timeout))
}

/// Falls back to a default client, which has no request timeout.
fn build_http_client(builder: reqwest::ClientBuilder) -> reqwest::Client {
    builder.build().unwrap_or_else(|e| {
        log::warn!("Failed to build HTTP client ({e}); falling back to defaults without a timeout");
        reqwest::Client::default()
    })
}

impl CompletionClient {
    /// Create a client for the default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    /// Create a client from the `OPENAI_API_KEY` environment variable
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CompletionError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl Completion for CompletionClient {
    async fn complete(&self, conversation: &[Message]) -> Result<String, CompletionError> {
        if conversation.is_empty() {
            return Err(CompletionError::EmptyConversation);
        }

        let request = ChatRequest {
            model: self.model.as_str(),
            messages: conversation,
        };

        log::debug!(
            "POST chat completion: model={} messages={}",
            self.model,
            conversation.len()
        );

        let response = CompletionRequestHelper::new(&self.http, &self.base_url, &self.api_key)
            .send_chat_request(&request)
            .await?;

        response.into_text()
    }
}
