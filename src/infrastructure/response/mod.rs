use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Cleans an LLM response by removing common artifacts and unwanted tags
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = response.to_string();

    // Remove <think>...</think> and <think/> tags
    cleaned = THINK_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    // Remove <reasoning>...</reasoning> tags (some models use this)
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned.trim().to_string();

    // Collapse multiple consecutive newlines into at most two
    cleaned = MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string();

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>[{\"type\":\"bar\"}]";
        assert_eq!(clean_llm_response(input), "[{\"type\":\"bar\"}]");
    }

    #[test]
    fn test_clean_self_closing_think() {
        let input = "<think/>[]";
        assert_eq!(clean_llm_response(input), "[]");
    }

    #[test]
    fn test_collapses_newlines() {
        let input = "a\n\n\n\nb";
        assert_eq!(clean_llm_response(input), "a\n\nb");
    }

    #[test]
    fn test_plain_response_unchanged() {
        assert_eq!(clean_llm_response("  [1, 2]  "), "[1, 2]");
    }
}
