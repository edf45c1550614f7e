//! Text utilities for untrusted model output.

/// Strip a markdown code-fence wrapper from model output.
///
/// Handles `` ```json ... ``` ``, bare `` ``` ... ``` `` and other
/// language tags. Content without a full fence is returned trimmed.
#[must_use]
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // first line is the optional language tag
    match body.split_once('\n') {
        Some((_, rest)) => rest.trim(),
        None => body.trim(),
    }
}

/// Widest `{...}` span in the text: first opening brace through the last
/// closing brace. The span is a candidate for JSON parsing, nothing more.
#[must_use]
pub fn extract_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| text.get(start..=end)).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fence(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_plain_fence() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fence(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_no_fence_trimmed() {
        assert_eq!(strip_code_fence("  {\"key\": 1}  "), "{\"key\": 1}");
    }

    #[test]
    fn test_unterminated_fence_left_alone() {
        let input = "```json\n{\"key\": 1}";
        assert_eq!(strip_code_fence(input), input.trim());
    }

    #[test]
    fn test_span_around_prose() {
        let text = "Here is your reading: {\"tags\": []} — be well.";
        assert_eq!(extract_object_span(text), Some("{\"tags\": []}"));
    }

    #[test]
    fn test_span_greedy_across_nested_objects() {
        let text = "{\"a\": {\"b\": 1}} trailing {\"c\": 2}";
        assert_eq!(extract_object_span(text), Some("{\"a\": {\"b\": 1}} trailing {\"c\": 2}"));
    }

    #[test]
    fn test_span_absent() {
        assert_eq!(extract_object_span("no braces here"), None);
        assert_eq!(extract_object_span("} reversed {"), None);
        assert_eq!(extract_object_span(""), None);
    }
}
