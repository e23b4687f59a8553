//! Pulling structured JSON out of free-form model replies.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Slice of `reply` spanning its outermost JSON object.
///
/// Models often wrap the object in prose or a fenced code block.
pub fn json_object(reply: &str) -> ExtractionResult<&str> {
    let start = reply.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let end = reply.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if end < start {
        return Err(ExtractionError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }
    Ok(&reply[start..=end])
}

/// Deserialize the JSON object embedded in `reply`.
pub fn parse_embedded<T: DeserializeOwned>(reply: &str) -> ExtractionResult<T> {
    let json = json_object(reply)?;
    Ok(serde_json::from_str(json)?)
}

/// Trim each entry and drop the empty ones.
pub(crate) fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn test_json_object_bare() {
        assert_eq!(json_object(r#"{"value":1}"#).unwrap(), r#"{"value":1}"#);
    }

    #[test]
    fn test_json_object_in_code_fence() {
        let reply = "Sure, here you go:\n```json\n{\"value\": 7}\n```\nStay well!";
        let probe: Probe = parse_embedded(reply).unwrap();
        assert_eq!(probe, Probe { value: 7 });
    }

    #[test]
    fn test_no_object() {
        assert!(matches!(
            json_object("I cannot help with that."),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            json_object("} backwards {"),
            Err(ExtractionError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_malformed_object() {
        let result: ExtractionResult<Probe> = parse_embedded("{\"value\": }");
        assert!(matches!(result, Err(ExtractionError::JsonParse(_))));
    }

    #[test]
    fn test_clean_list() {
        let cleaned = clean_list(vec![" Rest ".into(), "".into(), "  ".into(), "Fluids".into()]);
        assert_eq!(cleaned, vec!["Rest", "Fluids"]);
    }
}
