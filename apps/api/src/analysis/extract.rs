//! Pulls the keyword object out of free-form model output.

use serde_json::Value;

use super::{AnalysisError, KeywordSet};

/// Returns the first balanced `{...}` substring of `text`.
///
/// Braces inside JSON string literals (including escaped quotes) do not count
/// toward the balance. A `{` that is never closed is skipped and the search
/// resumes at the next `{`. Returns `None` when no object closes.
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(found) = text[from..].find('{') {
        let start = from + found;
        if let Some(end) = closing_brace(&text.as_bytes()[start..]) {
            return Some(&text[start..=start + end]);
        }
        from = start + 1;
    }
    None
}

/// Offset of the `}` that closes the object opening at `bytes[0]`.
fn closing_brace(bytes: &[u8]) -> Option<usize> {
    let (mut depth, mut in_str, mut escape) = (0usize, false, false);

    for (offset, &b) in bytes.iter().enumerate() {
        if in_str {
            if escape {
                escape = false;
            } else if b == b'\\' {
                escape = true;
            } else if b == b'"' {
                in_str = false;
            }
            continue;
        }

        match b {
            b'"' => in_str = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses the `{"keywords": [...]}` object from model output.
///
/// Blank entries are dropped; an object whose keyword list ends up empty is
/// rejected, since a `KeywordSet` is never empty.
pub fn parse_keywords(text: &str) -> Result<KeywordSet, AnalysisError> {
    let object = extract_first_json_object(text)
        .ok_or_else(|| parse_error("no JSON object found in response"))?;

    let value: Value = serde_json::from_str(object)
        .map_err(|e| parse_error(&format!("response object is not valid JSON ({e})")))?;

    let list = value
        .get("keywords")
        .ok_or_else(|| parse_error("response is missing the 'keywords' field"))?
        .as_array()
        .ok_or_else(|| parse_error("'keywords' is not an array"))?;

    let mut keywords = Vec::with_capacity(list.len());
    for item in list {
        let keyword = item
            .as_str()
            .ok_or_else(|| parse_error("'keywords' must contain only strings"))?
            .trim();
        if !keyword.is_empty() {
            keywords.push(keyword.to_string());
        }
    }

    KeywordSet::new(keywords).ok_or_else(|| parse_error("'keywords' is empty"))
}

fn parse_error(detail: &str) -> AnalysisError {
    AnalysisError::Parse(detail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bare_object() {
        let text = r#"{"keywords": ["rust"]}"#;
        assert_eq!(extract_first_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_object_surrounded_by_prose() {
        let text = "Sure! Here you go:\n```json\n{\"keywords\": [\"data-engineer\"]}\n```\nGood luck.";
        assert_eq!(
            extract_first_json_object(text),
            Some("{\"keywords\": [\"data-engineer\"]}")
        );
    }

    #[test]
    fn test_extract_returns_first_of_multiple_objects() {
        let text = r#"{"keywords": ["first"]} {"keywords": ["second"]}"#;
        assert_eq!(
            extract_first_json_object(text),
            Some(r#"{"keywords": ["first"]}"#)
        );
    }

    #[test]
    fn test_extract_handles_nested_objects() {
        let text = r#"prefix {"meta": {"k": 1}, "keywords": ["x"]} suffix"#;
        assert_eq!(
            extract_first_json_object(text),
            Some(r#"{"meta": {"k": 1}, "keywords": ["x"]}"#)
        );
    }

    #[test]
    fn test_extract_ignores_braces_inside_strings() {
        let text = r#"{"keywords": ["c++ }{ dev", "say \"}\""]} tail"#;
        assert_eq!(
            extract_first_json_object(text),
            Some(r#"{"keywords": ["c++ }{ dev", "say \"}\""]}"#)
        );
    }

    #[test]
    fn test_extract_truncated_object_is_none() {
        assert_eq!(extract_first_json_object(r#"{"keywords": ["rust""#), None);
    }

    #[test]
    fn test_extract_skips_unclosed_brace_in_prose() {
        let text = r#"Note: the { character opens a block. {"keywords": ["rust"]}"#;
        assert_eq!(
            extract_first_json_object(text),
            Some(r#"{"keywords": ["rust"]}"#)
        );
        assert_eq!(parse_keywords(text).unwrap().as_slice(), ["rust"]);
    }

    #[test]
    fn test_extract_without_braces_is_none() {
        assert_eq!(extract_first_json_object("no json here"), None);
        assert_eq!(extract_first_json_object(""), None);
    }

    #[test]
    fn test_extract_inside_array_wrapper() {
        let text = r#"[{"keywords": ["qa"]}]"#;
        assert_eq!(
            extract_first_json_object(text),
            Some(r#"{"keywords": ["qa"]}"#)
        );
    }

    #[test]
    fn test_extract_handles_multibyte_text() {
        let text = "Résumé → {\"keywords\": [\"ingénieur\"]} ✓";
        assert_eq!(
            extract_first_json_object(text),
            Some("{\"keywords\": [\"ingénieur\"]}")
        );
    }

    #[test]
    fn test_parse_keywords_single_entry() {
        let set = parse_keywords(r#"{"keywords":["backend-engineer"]}"#).unwrap();
        assert_eq!(set.as_slice(), ["backend-engineer".to_string()]);
    }

    #[test]
    fn test_parse_keywords_keeps_order_and_count() {
        let set = parse_keywords(r#"{"keywords":["rust","go","sre"]}"#).unwrap();
        assert_eq!(set.as_slice(), ["rust", "go", "sre"]);
    }

    #[test]
    fn test_parse_keywords_drops_blank_entries() {
        let set = parse_keywords(r#"{"keywords":["  ", " devops "]}"#).unwrap();
        assert_eq!(set.as_slice(), ["devops"]);
    }

    #[test]
    fn test_parse_keywords_missing_field() {
        let err = parse_keywords(r#"{"skills":["rust"]}"#).unwrap_err();
        match err {
            AnalysisError::Parse(msg) => assert!(msg.contains("keywords")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_keywords_empty_list() {
        assert!(matches!(
            parse_keywords(r#"{"keywords":[]}"#),
            Err(AnalysisError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_keywords_non_string_entries() {
        assert!(matches!(
            parse_keywords(r#"{"keywords":[1, 2]}"#),
            Err(AnalysisError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_keywords_invalid_json_object() {
        let err = parse_keywords("use {curly} braces").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn test_parse_keywords_no_object() {
        let err = parse_keywords("I could not read the document.").unwrap_err();
        assert!(err.to_string().contains("no JSON object"));
    }
}
