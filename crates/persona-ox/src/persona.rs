use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/9.x/personas/png";

/// A fictional marketing persona as produced by the persona generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub demographics: Demographics,
    pub psychographics: Psychographics,
    pub behavior_and_decision_making: BehaviorAndDecisionMaking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    /// Grouping key for answers; not guaranteed unique across a batch
    pub name: String,
    pub age_range: String,
    pub gender: String,
    pub marital_status: String,
    pub income: String,
    pub education: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Psychographics {
    pub personality_traits: Vec<String>,
    pub values_and_beliefs: Vec<String>,
    pub interests_and_hobbies: Vec<String>,
    pub lifestyle_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorAndDecisionMaking {
    pub information_sources: Vec<String>,
    pub purchase_decision_influences: Vec<String>,
    pub key_behaviors_and_habits: Vec<String>,
}

impl Persona {
    /// Deserialize and validate the element at `index` of a generated batch.
    pub fn from_value(index: usize, value: Value) -> Result<Self, SchemaError> {
        let persona: Persona = serde_json::from_value(value)
            .map_err(|source| SchemaError::InvalidShape { index, source })?;
        persona.validate(index)?;
        Ok(persona)
    }

    /// Reject blank strings and empty lists anywhere in the record.
    pub fn validate(&self, index: usize) -> Result<(), SchemaError> {
        let text_fields = self
            .demographics
            .fields()
            .into_iter()
            .map(|(field, value)| (field.path, value.trim().is_empty()));
        let list_fields = self
            .psychographics
            .fields()
            .into_iter()
            .chain(self.behavior_and_decision_making.fields())
            .map(|(field, values)| {
                (
                    field.path,
                    values.is_empty() || values.iter().all(|v| v.trim().is_empty()),
                )
            });

        match text_fields.chain(list_fields).find(|(_, empty)| *empty) {
            Some((field, _)) => Err(SchemaError::EmptyField { index, field }),
            None => Ok(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.demographics.name
    }

    /// Decorative avatar seeded by the persona name
    pub fn avatar_url(&self) -> String {
        url::Url::parse_with_params(AVATAR_BASE_URL, [("seed", self.name())])
            .map(String::from)
            .unwrap_or_else(|_| AVATAR_BASE_URL.to_string())
    }
}

/// A persona field with its display label and dotted schema path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub path: &'static str,
}

const fn field(label: &'static str, path: &'static str) -> Field {
    Field { label, path }
}

impl Demographics {
    pub fn fields(&self) -> [(Field, &str); 6] {
        [
            (field("Name", "demographics.name"), self.name.as_str()),
            (field("Age Range", "demographics.age_range"), self.age_range.as_str()),
            (field("Gender", "demographics.gender"), self.gender.as_str()),
            (
                field("Marital Status", "demographics.marital_status"),
                self.marital_status.as_str(),
            ),
            (field("Income", "demographics.income"), self.income.as_str()),
            (field("Education", "demographics.education"), self.education.as_str()),
        ]
    }
}

impl Psychographics {
    pub fn fields(&self) -> [(Field, &[String]); 4] {
        [
            (
                field("Personality Traits", "psychographics.personality_traits"),
                self.personality_traits.as_slice(),
            ),
            (
                field("Values And Beliefs", "psychographics.values_and_beliefs"),
                self.values_and_beliefs.as_slice(),
            ),
            (
                field("Interests And Hobbies", "psychographics.interests_and_hobbies"),
                self.interests_and_hobbies.as_slice(),
            ),
            (
                field("Lifestyle Factors", "psychographics.lifestyle_factors"),
                self.lifestyle_factors.as_slice(),
            ),
        ]
    }
}

impl BehaviorAndDecisionMaking {
    pub fn fields(&self) -> [(Field, &[String]); 3] {
        [
            (
                field(
                    "Information Sources",
                    "behavior_and_decision_making.information_sources",
                ),
                self.information_sources.as_slice(),
            ),
            (
                field(
                    "Purchase Decision Influences",
                    "behavior_and_decision_making.purchase_decision_influences",
                ),
                self.purchase_decision_influences.as_slice(),
            ),
            (
                field(
                    "Key Behaviors And Habits",
                    "behavior_and_decision_making.key_behaviors_and_habits",
                ),
                self.key_behaviors_and_habits.as_slice(),
            ),
        ]
    }
}
