use std::fmt;

use serde::{Deserialize, Serialize};

/// Chat models known to work with the persona prompts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Model {
    #[default]
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,

    #[serde(rename = "gpt-4o")]
    Gpt4o,

    /// Custom model (for models not in this enum)
    #[serde(untagged)]
    Custom(String),
}

impl Model {
    /// Get the wire identifier of the model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt4o => "gpt-4o",
            Model::Custom(s) => s,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        match s.as_str() {
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4o" => Model::Gpt4o,
            _ => Model::Custom(s),
        }
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from(s.to_string())
    }
}
