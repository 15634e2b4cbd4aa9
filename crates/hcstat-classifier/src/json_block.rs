//! Extraction of JSON payloads from free-form model text

use serde_json::Value;

/// Find the first JSON document in model output
///
/// Tried in order: the first fenced ```` ```json ```` block, the whole text,
/// then the span from the first `{` to the last `}`.
pub fn extract_first_json_block(text: &str) -> Option<Value> {
    if let Some(value) = fenced_json_block(text).and_then(|block| serde_json::from_str(block).ok())
    {
        return Some(value);
    }

    if let Ok(value) = serde_json::from_str(text.trim()) {
        return Some(value);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn fenced_json_block(text: &str) -> Option<&str> {
    let fence = text.find("```json")?;
    let body = &text[fence + "```json".len()..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_block() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nand also ```json\n{\"a\": 2}\n```";
        assert_eq!(extract_first_json_block(text), Some(json!({"a": 1})));
    }

    #[test]
    fn test_bare_json() {
        assert_eq!(
            extract_first_json_block("  {\"coordinates\": []} \n"),
            Some(json!({"coordinates": []}))
        );
    }

    #[test]
    fn test_embedded_object() {
        let text = "The answer is {\"challenge_prompt\": \"x\", \"coordinates\": []} as requested.";
        assert_eq!(
            extract_first_json_block(text),
            Some(json!({"challenge_prompt": "x", "coordinates": []}))
        );
    }

    #[test]
    fn test_broken_fence_falls_back_to_braces() {
        let text = "```json\n{\"a\": 1,}\n```\n{\"a\": 3}";
        // The fenced block is invalid; the brace span covers both objects and
        // is invalid too
        assert_eq!(extract_first_json_block(text), None);
    }

    #[test]
    fn test_no_json() {
        assert_eq!(extract_first_json_block("I cannot solve this"), None);
        assert_eq!(extract_first_json_block("} backwards {"), None);
    }
}
