use std::string::FromUtf8Error;

use serde::Deserialize;
use strum::Display;
use thiserror::Error;

use crate::generator::PersonaCount;

/// OpenAI-style error envelope
#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    error: Option<ApiError>,
}

/// Specific error information returned by the completion service
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    r#type: Option<String>,
    code: Option<String>,
}

/// Errors raised while talking to the completion service.
///
/// Every variant is fatal to the current run; nothing here is retried.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// HTTP client errors (connection, timeout, TLS)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The service rejected the request with a structured error
    #[error("Invalid request error (HTTP {status}): {message}")]
    InvalidRequest {
        status: u16,
        code: Option<String>,
        message: String,
        r#type: Option<String>,
    },

    /// Quota or rate limit rejection
    #[error("Rate limit exceeded: {message}")]
    RateLimit { message: String },

    /// Unexpected response from the service
    #[error("Unexpected response from API: {0}")]
    UnexpectedResponse(String),

    /// The response carried no choice or no message content
    #[error("Completion response contained no content")]
    NoContent,

    /// A conversation needs at least one message
    #[error("Conversation must contain at least one message")]
    EmptyConversation,

    /// No credential was supplied
    #[error("Missing API key")]
    MissingApiKey,
}

/// Raised when model output cannot be read as a JSON array.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unable to parse JSON from the response: no JSON array found")]
    NoArray,

    #[error("Unable to parse JSON from the response: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        response_text: String,
    },
}

/// Raised when parsed personas lack required fields.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("The response contained no personas")]
    NoPersonas,

    #[error("Persona {} does not match the expected schema: {source}", .index + 1)]
    InvalidShape {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Persona {} has an empty `{field}`", .index + 1)]
    EmptyField { index: usize, field: &'static str },
}

/// Errors raised while serializing answer records.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Utf8(#[from] FromUtf8Error),
}

/// Coarse classification used by surfaces to name a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    Upstream,
    Parse,
    Schema,
    Input,
    Internal,
}

/// Any failure that halts an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Completion request failed: {0}")]
    Upstream(#[from] CompletionError),

    /// One (persona, question) unit of the batch failed; siblings were discarded
    #[error("Answering \"{question}\" for {persona} failed: {source}")]
    AnswerFailed {
        persona: String,
        question: String,
        #[source]
        source: CompletionError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(
        "Number of personas must be between {} and {}, got {requested}",
        PersonaCount::MIN,
        PersonaCount::MAX
    )]
    InvalidPersonaCount { requested: u8 },

    #[error("Failed to encode persona: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Batch worker failed: {0}")]
    Internal(String),
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Upstream(_) | AnalysisError::AnswerFailed { .. } => ErrorKind::Upstream,
            AnalysisError::Parse(_) => ErrorKind::Parse,
            AnalysisError::Schema(_) => ErrorKind::Schema,
            AnalysisError::InvalidPersonaCount { .. } => ErrorKind::Input,
            AnalysisError::Encode(_) | AnalysisError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn internal(error: impl std::fmt::Display) -> Self {
        AnalysisError::Internal(error.to_string())
    }
}

/// Turn a non-success HTTP response into a [`CompletionError`]
pub(crate) fn parse_error_response(status: reqwest::StatusCode, bytes: &bytes::Bytes) -> CompletionError {
    let payload = serde_json::from_slice::<ApiErrorPayload>(bytes)
        .ok()
        .and_then(|payload| payload.error);

    match payload {
        Some(error) if status == reqwest::StatusCode::TOO_MANY_REQUESTS => {
            CompletionError::RateLimit {
                message: error.message,
            }
        }
        Some(error) => CompletionError::InvalidRequest {
            status: status.as_u16(),
            code: error.code,
            message: error.message,
            r#type: error.r#type,
        },
        None if status == reqwest::StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimit {
            message: String::from_utf8_lossy(bytes).to_string(),
        },
        None => CompletionError::UnexpectedResponse(format!(
            "HTTP status {}: {}",
            status.as_u16(),
            String::from_utf8_lossy(bytes)
        )),
    }
}
