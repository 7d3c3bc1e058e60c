mod common;

use common::{ScriptedCompletion, persona_json};
use persona_ox::{AnalysisError, ParseError, PersonaCount, SchemaError, generate_personas};
use serde_json::{Value, json};

const KEYWORD: &str = "running shoes";

#[tokio::test]
async fn test_prose_wrapped_array_is_accepted() {
    let array = Value::Array(vec![persona_json("Ada"), persona_json("Linus")]);
    let stub = ScriptedCompletion::new(format!(
        "Sure! Here are the personas you asked for:\n```json\n{array}\n```\nLet me know if you need more."
    ));

    let personas = generate_personas(&stub, KEYWORD, "buy", PersonaCount::new(2).unwrap())
        .await
        .unwrap();

    assert_eq!(personas.len(), 2);
    assert_eq!(personas[0].name(), "Ada");
    assert_eq!(personas[1].name(), "Linus");
}

#[tokio::test]
async fn test_prompt_carries_keyword_intent_and_count() {
    let stub = ScriptedCompletion::with_personas(&["Ada"]);

    generate_personas(&stub, KEYWORD, "Compare cushioning", PersonaCount::new(1).unwrap())
        .await
        .unwrap();

    let prompts = stub.prompts.lock().unwrap();
    assert!(prompts[0].contains("keyword: running shoes"));
    assert!(prompts[0].contains("intent of: Compare cushioning"));
    assert!(prompts[0].contains("generate 1 different but unique personas"));
}

#[tokio::test]
async fn test_count_mismatch_is_tolerated() {
    let stub = ScriptedCompletion::with_personas(&["Ada", "Linus", "Grace"]);

    let personas = generate_personas(&stub, KEYWORD, "buy", PersonaCount::new(2).unwrap())
        .await
        .unwrap();

    assert_eq!(personas.len(), 3);
}

#[tokio::test]
async fn test_refusal_text_is_a_parse_error() {
    let stub = ScriptedCompletion::new("I'm sorry, I can't help with that.");

    let err = generate_personas(&stub, KEYWORD, "buy", PersonaCount::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Parse(ParseError::NoArray)));
}

#[tokio::test]
async fn test_empty_array_has_no_personas() {
    let stub = ScriptedCompletion::new("[]");

    let err = generate_personas(&stub, KEYWORD, "buy", PersonaCount::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Schema(SchemaError::NoPersonas)));
}

#[tokio::test]
async fn test_one_malformed_persona_fails_the_batch() {
    let mut broken = persona_json("Linus");
    broken["psychographics"]
        .as_object_mut()
        .unwrap()
        .remove("lifestyle_factors");
    let stub = ScriptedCompletion::new(json!([persona_json("Ada"), broken]).to_string());

    let err = generate_personas(&stub, KEYWORD, "buy", PersonaCount::new(2).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::Schema(SchemaError::InvalidShape { index: 1, .. })
    ));
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let stub = ScriptedCompletion::new(json!([persona_json("  ")]).to_string());

    let err = generate_personas(&stub, KEYWORD, "buy", PersonaCount::new(1).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::Schema(SchemaError::EmptyField {
            index: 0,
            field: "demographics.name"
        })
    ));
}
