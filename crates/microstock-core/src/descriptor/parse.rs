//! Strict parsing of vision-model replies into `ExternalDescriptor`s.

use crate::error::DescriptorError;
use crate::types::ExternalDescriptor;

/// Parse a model reply. A single surrounding Markdown code fence is
/// tolerated; anything else that is not exactly one descriptor object is
/// `Malformed`.
pub fn parse_descriptor(text: &str) -> Result<ExternalDescriptor, DescriptorError> {
    let body = strip_code_fence(text.trim());
    let descriptor: ExternalDescriptor = serde_json::from_str(body)
        .map_err(|e| DescriptorError::Malformed(format!("descriptor JSON: {e}")))?;

    if descriptor.main_color.trim().is_empty() {
        return Err(DescriptorError::Malformed(
            "descriptor main_color is empty".to_string(),
        ));
    }
    Ok(descriptor)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_descriptor() {
        let parsed = parse_descriptor(
            r#"{"main_color":"blue","secondary_colors":["purple"],"shapes":["waves"],
                "style":["fluid"],"mood":["calm"],"best_use":["presentations"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.main_color, "blue");
        assert_eq!(parsed.secondary_colors, vec!["purple"]);
        assert_eq!(parsed.mood, vec!["calm"]);
    }

    #[test]
    fn test_parse_strips_code_fence() {
        let parsed = parse_descriptor("```json\n{\"main_color\":\"teal\"}\n```").unwrap();
        assert_eq!(parsed.main_color, "teal");
        let parsed = parse_descriptor("```\n{\"main_color\":\"red\"}```").unwrap();
        assert_eq!(parsed.main_color, "red");
    }

    #[test]
    fn test_missing_main_color_is_malformed() {
        let err = parse_descriptor(r#"{"shapes":["waves"]}"#).unwrap_err();
        assert!(matches!(err, DescriptorError::Malformed(_)));
        let err = parse_descriptor(r#"{"main_color":"  "}"#).unwrap_err();
        assert!(matches!(err, DescriptorError::Malformed(_)));
    }

    #[test]
    fn test_type_mismatch_is_malformed() {
        let err = parse_descriptor(r#"{"main_color":"blue","shapes":"waves"}"#).unwrap_err();
        assert!(matches!(err, DescriptorError::Malformed(_)));
    }

    #[test]
    fn test_prose_is_malformed() {
        let err = parse_descriptor("The image is mostly blue with waves.").unwrap_err();
        assert!(matches!(err, DescriptorError::Malformed(_)));
        assert!(parse_descriptor("").is_err());
    }
}
