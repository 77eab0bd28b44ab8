//! Tolerant recovery of a JSON object from raw capability output.
//!
//! Providers wrap JSON in prose or markdown fences often enough that a
//! strict `from_str` on the whole response would discard good answers.

/// Extracts the outermost JSON object substring from raw output.
///
/// Returns `None` when no balanced-looking `{…}` region exists; content
/// validation happens at the schema layer.
pub(crate) fn extract_json_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(raw[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object_passes_through() {
        let raw = r#"{"lintable": true, "reasoning": "ok"}"#;
        assert_eq!(extract_json_object(raw).as_deref(), Some(raw));
    }

    #[test]
    fn fenced_object_is_recovered() {
        let raw = "Here you go:\n```json\n{\"lintable\": false}\n```\nHope that helps!";
        assert_eq!(
            extract_json_object(raw).as_deref(),
            Some("{\"lintable\": false}")
        );
    }

    #[test]
    fn prose_wrapped_object_is_recovered() {
        let raw = "The answer is {\"outcome\": \"translated\", \"refined_rules\": []} as requested.";
        let json = extract_json_object(raw).expect("object");
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
    }

    #[test]
    fn garbage_yields_none() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
        assert_eq!(extract_json_object(""), None);
    }
}
