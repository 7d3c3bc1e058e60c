//! Extraction of JSON arrays from model output.
//!
//! Models are asked to return nothing but a JSON array, yet they often wrap
//! it in prose. Parsing is two-stage: the whole text first, then the span
//! from the first `[` to the last `]`. A text holding several bracketed
//! fragments may extract the wrong span; that limitation is accepted.

use serde_json::Value;

use crate::error::ParseError;

/// Parse `text` as a JSON array, falling back to the outermost bracket span.
pub fn parse_json_array(text: &str) -> Result<Vec<Value>, ParseError> {
    if let Ok(items) = serde_json::from_str::<Vec<Value>>(text) {
        return Ok(items);
    }

    let span = bracket_span(text).ok_or(ParseError::NoArray)?;
    serde_json::from_str::<Vec<Value>>(span).map_err(|source| ParseError::InvalidJson {
        source,
        response_text: text.to_string(),
    })
}

fn bracket_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_array() {
        let items = parse_json_array(r#"[{"a": 1}, {"b": [2, 3]}]"#).unwrap();
        assert_eq!(items, vec![json!({"a": 1}), json!({"b": [2, 3]})]);
    }

    #[test]
    fn test_array_wrapped_in_prose() {
        let array = r#"[{"name": "Ada"}, {"name": "Linus"}]"#;
        let wrapped = format!("Sure, here you go:\n{array}\nHope this helps!");
        assert_eq!(
            parse_json_array(&wrapped).unwrap(),
            parse_json_array(array).unwrap()
        );
    }

    #[test]
    fn test_array_in_markdown_fence() {
        let text = "```json\n[1, 2, 3]\n```";
        assert_eq!(parse_json_array(text).unwrap(), vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_no_opening_bracket() {
        assert!(matches!(
            parse_json_array("I cannot help with that."),
            Err(ParseError::NoArray)
        ));
        assert!(matches!(parse_json_array("oops ] ["), Err(ParseError::NoArray)));
    }

    #[test]
    fn test_broken_span() {
        let err = parse_json_array("Here: [{\"name\": }] done").unwrap_err();
        match err {
            ParseError::InvalidJson { response_text, .. } => {
                assert_eq!(response_text, "Here: [{\"name\": }] done");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_multiple_fragments_extract_outer_span() {
        // The span runs from the first `[` to the last `]`, which is not valid JSON here.
        let text = "first [1, 2] and then [3]";
        assert!(matches!(
            parse_json_array(text),
            Err(ParseError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_object_document_falls_back_to_inner_array() {
        let text = r#"{"personas": [{"name": "Ada"}]}"#;
        assert_eq!(parse_json_array(text).unwrap(), vec![json!({"name": "Ada"})]);
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_json_array("[]").unwrap().is_empty());
    }
}
