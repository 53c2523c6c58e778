use serde_json::Value;
use tracing::warn;

use crate::core::extractor::ExtractedRelation;
use crate::error::ExtractError;

/// Parse a raw model response into relation records.
///
/// The response must decode to a JSON array; anything else (prose,
/// truncated JSON) is a `MalformedResponse`. Individual records missing any
/// of the five required keys are classified as incomplete, logged, and
/// dropped; sibling records survive in their original order.
pub fn parse_relations(raw: &str) -> Result<Vec<ExtractedRelation>, ExtractError> {
    let content = strip_code_fence(raw.trim());

    let value: Value = serde_json::from_str(content)
        .map_err(|e| ExtractError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let items = value
        .as_array()
        .ok_or_else(|| ExtractError::MalformedResponse("expected a JSON array".to_string()))?;

    let mut relations = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match validate_record(item) {
            Ok(relation) => relations.push(relation),
            Err(e) => warn!("Dropping record {}: {}", index, e),
        }
    }

    Ok(relations)
}

/// Models regularly wrap the array in markdown fencing despite the prompt
/// asking them not to.
fn strip_code_fence(content: &str) -> &str {
    if let Some(inner) = content.strip_prefix("```json").and_then(|c| c.strip_suffix("```")) {
        inner.trim()
    } else if let Some(inner) = content.strip_prefix("```").and_then(|c| c.strip_suffix("```")) {
        inner.trim()
    } else {
        content
    }
}

fn validate_record(item: &Value) -> Result<ExtractedRelation, ExtractError> {
    let object = item
        .as_object()
        .ok_or(ExtractError::IncompleteRecord { field: "head" })?;

    Ok(ExtractedRelation {
        head: required_field(object, "head")?,
        head_type: required_field(object, "head_type")?,
        relation: required_field(object, "relation")?,
        tail: required_field(object, "tail")?,
        tail_type: required_field(object, "tail_type")?,
    })
}

fn required_field(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, ExtractError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(ExtractError::IncompleteRecord { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_RECORD: &str = r#"{"head":"Acme Widget","head_type":"product","relation":"hasColor","tail":"red","tail_type":"color"}"#;

    #[test]
    fn test_parse_valid_array() {
        let raw = format!("[{}]", VALID_RECORD);
        let relations = parse_relations(&raw).unwrap();

        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].head, "Acme Widget");
        assert_eq!(relations[0].relation, "hasColor");
        assert_eq!(relations[0].tail, "red");
    }

    #[test]
    fn test_parse_fenced_array() {
        let raw = format!("```json\n[{}]\n```", VALID_RECORD);
        assert_eq!(parse_relations(&raw).unwrap().len(), 1);

        let raw = format!("```\n[{}]\n```", VALID_RECORD);
        assert_eq!(parse_relations(&raw).unwrap().len(), 1);
    }

    #[test]
    fn test_prose_is_malformed_response() {
        let err = parse_relations("I could not find any relations.").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedResponse(_)));
    }

    #[test]
    fn test_truncated_json_is_malformed_response() {
        let err = parse_relations(r#"[{"head":"Acme Widget","head_type":"#).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_array_is_malformed_response() {
        let err = parse_relations(r#"{"relations":[]}"#).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedResponse(_)));
    }

    #[test]
    fn test_record_missing_tail_is_dropped() {
        let raw = format!(
            r#"[{},{{"head":"Acme Widget","head_type":"product","relation":"hasBrand","tail_type":"brand"}},{}]"#,
            VALID_RECORD,
            VALID_RECORD.replace("red", "blue")
        );

        let relations = parse_relations(&raw).unwrap();
        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].tail, "red");
        assert_eq!(relations[1].tail, "blue");
    }

    #[test]
    fn test_empty_field_is_dropped() {
        let raw = r#"[{"head":"","head_type":"product","relation":"hasColor","tail":"red","tail_type":"color"}]"#;
        assert!(parse_relations(raw).unwrap().is_empty());
    }

    #[test]
    fn test_non_object_element_is_dropped() {
        let raw = format!(r#"["not a record",{}]"#, VALID_RECORD);
        assert_eq!(parse_relations(&raw).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_relations("[]").unwrap().is_empty());
    }

    #[test]
    fn test_validate_record_names_missing_field() {
        let value: Value =
            serde_json::from_str(r#"{"head":"x","head_type":"product","relation":"hasColor","tail_type":"color"}"#)
                .unwrap();
        let err = validate_record(&value).unwrap_err();
        assert!(matches!(err, ExtractError::IncompleteRecord { field: "tail" }));
    }
}
