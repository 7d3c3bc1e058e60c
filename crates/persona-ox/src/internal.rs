use serde::{Deserialize, Serialize};

use crate::{error::CompletionError, message::Message};

/// Request body for `POST /chat/completions`
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
}

/// The subset of the chat completion response the client reads
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, trimmed
    pub(crate) fn into_text(self) -> Result<String, CompletionError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(CompletionError::NoContent)
    }
}

/// Thin wrapper around `reqwest` that knows the endpoint and credential
pub(crate) struct CompletionRequestHelper<'a> {
    client: &'a reqwest::Client,
    url: String,
    api_key: &'a str,
}

impl<'a> CompletionRequestHelper<'a> {
    pub(crate) fn new(client: &'a reqwest::Client, base_url: &str, api_key: &'a str) -> Self {
        Self {
            client,
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
        }
    }

    pub(crate) async fn send_chat_request(
        &self,
        request: &ChatRequest<'_>,
    ) -> Result<ChatResponse, CompletionError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(crate::error::parse_error_response(status, &bytes));
        }

        serde_json::from_slice::<ChatResponse>(&bytes).map_err(|e| {
            CompletionError::UnexpectedResponse(format!(
                "HTTP {} but failed to decode JSON: {}; body: {}",
                status.as_u16(),
                e,
                String::from_utf8_lossy(&bytes)
            ))
        })
    }
}
