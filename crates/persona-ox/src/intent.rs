use crate::{client::Completion, error::CompletionError, message::Message};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes search intent.";

pub fn intent_conversation(keyword: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            "What is the most likely search intent when searching for '{keyword}'?"
        )),
    ]
}

/// Ask the model for the most likely search intent behind `keyword`.
///
/// The answer is free text and is returned as-is.
pub async fn infer_intent(
    client: &dyn Completion,
    keyword: &str,
) -> Result<String, CompletionError> {
    log::debug!("Inferring search intent for {keyword:?}");
    client.complete(&intent_conversation(keyword)).await
}
