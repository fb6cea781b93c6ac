//! Parsing of structured (JSON) model replies

use serde::de::DeserializeOwned;

/// Outcome of parsing a model reply into a structured shape.
///
/// Stages decide what to do with `Malformed`; the parser never substitutes
/// a fallback itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult<T> {
    Parsed(T),
    Malformed { raw: String, reason: String },
}

impl<T> ParseResult<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        match self {
            Self::Parsed(value) => ParseResult::Parsed(f(value)),
            Self::Malformed { raw, reason } => ParseResult::Malformed { raw, reason },
        }
    }

    pub fn parsed(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Malformed { .. } => None,
        }
    }
}

/// Parse `response` as JSON of type `T`.
///
/// A reply wrapped in a markdown code fence is unwrapped first.
pub fn parse_json<T: DeserializeOwned>(response: &str) -> ParseResult<T> {
    let body = strip_code_fence(response).unwrap_or(response);

    match serde_json::from_str::<T>(body.trim()) {
        Ok(value) => ParseResult::Parsed(value),
        Err(e) => ParseResult::Malformed {
            raw: response.to_string(),
            reason: e.to_string(),
        },
    }
}

/// Body of a markdown code fence spanning the whole reply, if there is one
fn strip_code_fence(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let rest = trimmed.strip_prefix("```")?;
    let rest = rest.strip_suffix("```")?;

    // Skip the info string ("json") on the opening line
    let newline = rest.find('\n')?;
    Some(&rest[newline + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        value: u32,
    }

    #[test]
    fn test_parse_plain_json() {
        let result: ParseResult<Sample> = parse_json(r#"{"value": 3}"#);
        assert_eq!(result, ParseResult::Parsed(Sample { value: 3 }));
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"value\": 7}\n```";
        let result: ParseResult<Sample> = parse_json(text);
        assert_eq!(result.parsed(), Some(Sample { value: 7 }));
    }

    #[test]
    fn test_parse_fence_without_info_string() {
        let text = "```\n{\"value\": 1}\n```";
        let result: ParseResult<Sample> = parse_json(text);
        assert!(result.is_parsed());
    }

    #[test]
    fn test_malformed_keeps_raw_text() {
        let text = "Sure! The value is three.";
        let result: ParseResult<Sample> = parse_json(text);

        match result {
            ParseResult::Malformed { raw, reason } => {
                assert_eq!(raw, text);
                assert!(!reason.is_empty());
            }
            ParseResult::Parsed(_) => panic!("expected malformed"),
        }
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let result: ParseResult<Sample> = parse_json(r#"{"value": "three"}"#);
        assert!(!result.is_parsed());
    }

    #[test]
    fn test_map() {
        let result: ParseResult<Sample> = parse_json(r#"{"value": 2}"#);
        assert_eq!(result.map(|s| s.value * 2), ParseResult::Parsed(4));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[]\n```"), Some("[]\n"));
        assert_eq!(strip_code_fence("[]"), None);
        assert_eq!(strip_code_fence("```[]```"), None);
    }
}
