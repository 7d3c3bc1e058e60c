//! Scripted stand-ins for the completion service.

#![allow(dead_code)]

use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use persona_ox::{Completion, CompletionError, Message, Role};
use serde_json::{Value, json};

pub const INTENT: &str = "Find comfortable, durable shoes for regular running.";

pub fn persona_json(name: &str) -> Value {
    json!({
        "demographics": {
            "name": name,
            "age_range": "25-34",
            "gender": "Female",
            "marital_status": "Single",
            "income": "$50,000-$75,000",
            "education": "Bachelor's degree"
        },
        "psychographics": {
            "personality_traits": ["Disciplined", "Curious"],
            "values_and_beliefs": ["Health first"],
            "interests_and_hobbies": ["Trail running", "Podcasts"],
            "lifestyle_factors": ["Trains five days a week"]
        },
        "behavior_and_decision_making": {
            "information_sources": ["Running forums", "YouTube reviews"],
            "purchase_decision_influences": ["Cushioning", "Price"],
            "key_behaviors_and_habits": ["Replaces shoes every 500 miles"]
        }
    })
}

fn system_prompt(conversation: &[Message]) -> &str {
    conversation
        .iter()
        .find(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}

fn user_prompt(conversation: &[Message]) -> &str {
    conversation
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}

/// Answers each stage of an analysis run with canned output.
pub struct ScriptedCompletion {
    /// Raw text returned for the persona generation request
    pub personas_response: String,
    /// A motivation request whose prompt contains this text fails
    pub fail_on: Option<String>,
    pub delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(personas_response: impl Into<String>) -> Self {
        Self {
            personas_response: personas_response.into(),
            fail_on: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_personas(names: &[&str]) -> Self {
        let array = Value::Array(names.iter().map(|name| persona_json(name)).collect());
        Self::new(array.to_string())
    }

    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    async fn complete(&self, conversation: &[Message]) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let system = system_prompt(conversation);
        let user = user_prompt(conversation).to_string();
        self.prompts.lock().unwrap().push(user.clone());

        if system.contains("analyzes search intent") {
            return Ok(INTENT.to_string());
        }
        if system.contains("persona generation") {
            return Ok(self.personas_response.clone());
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(needle) = &self.fail_on {
            if user.contains(needle.as_str()) {
                return Err(CompletionError::RateLimit {
                    message: "You exceeded your current quota".to_string(),
                });
            }
        }

        let question = user
            .rsplit("Answer the following question: ")
            .next()
            .unwrap_or_default();
        Ok(format!("Answer to: {question}"))
    }
}
