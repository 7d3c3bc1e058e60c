use std::{collections::HashSet, fmt};

use crate::{
    client::Completion,
    error::{AnalysisError, SchemaError},
    message::Message,
    parser::parse_json_array,
    persona::Persona,
};

const SYSTEM_PROMPT: &str = "You are an expert in marketing and consumer behavior, specifically in persona generation.";

/// The record layout every generated persona must follow.
pub const PERSONA_SCHEMA: &str = r#"{
  "demographics": {
    "name": "string",
    "age_range": "string",
    "gender": "string",
    "marital_status": "string",
    "income": "string",
    "education": "string"
  },
  "psychographics": {
    "personality_traits": ["string"],
    "values_and_beliefs": ["string"],
    "interests_and_hobbies": ["string"],
    "lifestyle_factors": ["string"]
  },
  "behavior_and_decision_making": {
    "information_sources": ["string"],
    "purchase_decision_influences": ["string"],
    "key_behaviors_and_habits": ["string"]
  }
}"#;

/// Number of personas requested from the model, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonaCount(u8);

impl PersonaCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(requested: u8) -> Result<Self, AnalysisError> {
        if (Self::MIN..=Self::MAX).contains(&requested) {
            Ok(Self(requested))
        } else {
            Err(AnalysisError::InvalidPersonaCount { requested })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for PersonaCount {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for PersonaCount {
    type Error = AnalysisError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PersonaCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn persona_conversation(keyword: &str, intent: &str, count: PersonaCount) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            "Given that the user is using the keyword: {keyword} with the intent of: {intent}, \
             generate {count} different but unique personas in JSON format. \
             Each persona should have the following structure:\n\n\
             {PERSONA_SCHEMA}\n\n\
             Provide the response as a valid JSON array of persona objects. \
             Do not include any text before or after the JSON array."
        )),
    ]
}

/// Generate personas for `keyword` and validate every one of them.
///
/// The batch is all-or-nothing: a single malformed element fails the call.
/// The model may return a different number of personas than requested;
/// that is logged, not rejected.
pub async fn generate_personas(
    client: &dyn Completion,
    keyword: &str,
    intent: &str,
    count: PersonaCount,
) -> Result<Vec<Persona>, AnalysisError> {
    let response = client
        .complete(&persona_conversation(keyword, intent, count))
        .await?;

    let items = parse_json_array(&response)?;
    if items.is_empty() {
        return Err(SchemaError::NoPersonas.into());
    }

    let personas = items
        .into_iter()
        .enumerate()
        .map(|(index, value)| Persona::from_value(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    if personas.len() != usize::from(count.get()) {
        log::warn!(
            "Requested {} personas but the model returned {}",
            count,
            personas.len()
        );
    }

    let mut seen = HashSet::new();
    for persona in &personas {
        if !seen.insert(persona.name()) {
            log::warn!("Duplicate persona name {:?}; answers will be grouped together", persona.name());
        }
    }

    Ok(personas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_bounds() {
        assert!(PersonaCount::new(0).is_err());
        assert_eq!(PersonaCount::new(1).unwrap().get(), 1);
        assert_eq!(PersonaCount::new(5).unwrap().get(), 5);
        assert!(matches!(
            PersonaCount::try_from(6),
            Err(AnalysisError::InvalidPersonaCount { requested: 6 })
        ));
        assert_eq!(PersonaCount::default().get(), 3);
    }

    #[test]
    fn test_prompt_embeds_inputs_and_schema() {
        let conversation = persona_conversation(
            "running shoes",
            "Buy cushioned shoes",
            PersonaCount::new(2).unwrap(),
        );
        assert_eq!(conversation.len(), 2);
        let prompt = &conversation[1].content;
        assert!(prompt.contains("keyword: running shoes"));
        assert!(prompt.contains("intent of: Buy cushioned shoes"));
        assert!(prompt.contains("generate 2 different but unique personas"));
        assert!(prompt.contains(PERSONA_SCHEMA));
        assert!(prompt.ends_with("Do not include any text before or after the JSON array."));
    }

    #[test]
    fn test_schema_block_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(PERSONA_SCHEMA).unwrap();
        assert!(value["demographics"]["name"].is_string());
        assert!(value["behavior_and_decision_making"]["key_behaviors_and_habits"].is_array());
    }
}
