//! Fan-out of the question battery across every generated persona.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    client::Completion,
    error::AnalysisError,
    message::Message,
    persona::Persona,
};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes consumer behavior.";

/// Upper bound for the default worker count.
pub const MAX_DEFAULT_CONCURRENCY: usize = 16;

/// One answer from one persona to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(rename = "Persona")]
    pub persona: String,
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer")]
    pub answer: String,
}

pub fn motivation_conversation(persona_json: &str, question: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            "Given this persona: {persona_json}\n\nAnswer the following question: {question}"
        )),
    ]
}

/// `min(16, available_parallelism + 4)`
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() + 4)
        .unwrap_or(MAX_DEFAULT_CONCURRENCY)
        .min(MAX_DEFAULT_CONCURRENCY)
}

/// Runs one completion per (persona, question) pair on a bounded pool.
#[derive(Clone)]
pub struct BatchRunner {
    client: Arc<dyn Completion>,
    max_concurrency: usize,
}

/// Outcome of a single unit, tagged with its slot in the result grid
type UnitResult = (usize, Result<AnswerRecord, AnalysisError>);

impl BatchRunner {
    pub fn new(client: Arc<dyn Completion>) -> Self {
        Self {
            client,
            max_concurrency: default_concurrency(),
        }
    }

    /// Cap the number of in-flight requests; values below 1 are raised to 1.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Ask every question of every persona.
    ///
    /// Returns `personas.len() * questions.len()` records in persona-major
    /// order. The first failing unit aborts the rest of the batch and no
    /// partial results are returned.
    pub async fn run(
        &self,
        personas: &[Persona],
        questions: &[String],
    ) -> Result<Vec<AnswerRecord>, AnalysisError> {
        let total = personas.len() * questions.len();
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut join_set: JoinSet<UnitResult> = JoinSet::new();

        log::debug!(
            "Dispatching {total} motivation requests with up to {} in flight",
            self.max_concurrency
        );

        for (persona_index, persona) in personas.iter().enumerate() {
            let persona_json = serde_json::to_string(persona)?;

            for (question_index, question) in questions.iter().enumerate() {
                let slot = persona_index * questions.len() + question_index;
                let client = Arc::clone(&self.client);
                let permits = Arc::clone(&permits);
                let conversation = motivation_conversation(&persona_json, question);
                let persona = persona.name().to_string();
                let question = question.clone();

                join_set.spawn(async move {
                    let _permit = match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => return (slot, Err(AnalysisError::internal(e))),
                    };
                    let result = answer(client.as_ref(), &conversation, persona, question).await;
                    (slot, result)
                });
            }
        }

        let mut slots: Vec<Option<AnswerRecord>> = vec![None; total];
        while let Some(joined) = join_set.join_next().await {
            let (slot, result) = joined.map_err(AnalysisError::internal)?;
            match result {
                Ok(record) => slots[slot] = Some(record),
                Err(e) => {
                    log::debug!("Aborting {} outstanding motivation requests", join_set.len());
                    join_set.abort_all();
                    return Err(e);
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

async fn answer(
    client: &dyn Completion,
    conversation: &[Message],
    persona: String,
    question: String,
) -> Result<AnswerRecord, AnalysisError> {
    match client.complete(conversation).await {
        Ok(answer) => Ok(AnswerRecord {
            persona,
            question,
            answer,
        }),
        Err(source) => Err(AnalysisError::AnswerFailed {
            persona,
            question,
            source,
        }),
    }
}
