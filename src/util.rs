//! Shared helpers for pulling structured content out of model completions.

use regex::Regex;
use std::sync::LazyLock;

static FENCED_JSON_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json[ \t]*\r?\n(.*?)\r?\n[ \t]*```").unwrap());

static FENCED_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[\w+-]*[ \t]*\r?\n(.*?)```").unwrap());

/// Body of the first ```json fenced block, if any.
pub fn extract_fenced_json(text: &str) -> Option<&str> {
    FENCED_JSON_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The span from the first `{` to the last `}` inclusive.
pub fn strip_to_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Pick the JSON payload of a completion: the first fenced json block,
/// otherwise whatever sits between the outermost braces.
pub fn extract_json_candidate(text: &str) -> Option<&str> {
    extract_fenced_json(text).or_else(|| strip_to_braces(text))
}

/// Body of the first fenced code block of any language.
pub fn extract_code_block(text: &str) -> Option<&str> {
    FENCED_CODE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Code to keep from a completion: the first fenced block when present,
/// otherwise the whole trimmed text. `None` when nothing but whitespace remains.
pub fn completion_code(text: &str) -> Option<String> {
    let code = extract_code_block(text).unwrap_or(text).trim();
    if code.is_empty() {
        None
    } else {
        Some(format!("{}\n", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here you go:\n```json\n{\"title\": \"Todo\"}\n```\nEnjoy";
        assert_eq!(extract_fenced_json(text), Some("{\"title\": \"Todo\"}"));
    }

    #[test]
    fn test_extract_fenced_json_prefers_first_block() {
        let text = "```json\n{\"a\": 1}\n```\n\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_fenced_json(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_fenced_json_ignores_other_languages() {
        let text = "```js\nconst a = {};\n```";
        assert_eq!(extract_fenced_json(text), None);
    }

    #[test]
    fn test_strip_to_braces() {
        let text = "Sure! {\"outer\": {\"inner\": 1}} hope that helps";
        assert_eq!(strip_to_braces(text), Some("{\"outer\": {\"inner\": 1}}"));
    }

    #[test]
    fn test_strip_to_braces_no_json() {
        assert_eq!(strip_to_braces("No JSON here"), None);
        assert_eq!(strip_to_braces("} backwards {"), None);
    }

    #[test]
    fn test_extract_json_candidate_falls_back_to_braces() {
        let text = "{\"title\": \"Quiz\"}";
        assert_eq!(extract_json_candidate(text), Some(text));
    }

    #[test]
    fn test_extract_code_block_any_language() {
        let text = "```javascript\nexport class Todo {}\n```";
        assert_eq!(extract_code_block(text), Some("export class Todo {}\n"));
    }

    #[test]
    fn test_completion_code_without_fence() {
        assert_eq!(
            completion_code("  export class Todo {}  "),
            Some("export class Todo {}\n".to_string())
        );
    }

    #[test]
    fn test_completion_code_blank_is_none() {
        assert_eq!(completion_code("   \n "), None);
        assert_eq!(completion_code("```js\n\n```"), None);
    }
}
