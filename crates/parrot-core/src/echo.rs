//! The stand-in for a real AI backend.
//!
//! All three derivations are pure, total and deterministic: the "response"
//! mirrors the input verbatim, the agent summary is a fixed template around
//! a snippet of the input, and the follow-up questions come from fixed
//! templates. The simulated latency lives in the runtime, not here.

use crate::constants::{AGENT_SUMMARY_PREFIX, QUESTION_TEMPLATES, SUMMARY_SNIPPET_CHARS};

/// Identity - explicitly not generation.
pub fn derive_response(user_text: &str) -> String {
    user_text.to_string()
}

/// Fixed template embedding the first `SUMMARY_SNIPPET_CHARS` characters of
/// the input (char-boundary safe).
pub fn derive_agent_summary(user_text: &str) -> String {
    format!("{} {}", AGENT_SUMMARY_PREFIX, snippet(user_text))
}

/// Exactly `QUESTIONS_PER_INPUT` derived follow-up questions, in template
/// order.
pub fn derive_questions(user_text: &str) -> Vec<String> {
    let snippet = snippet(user_text);
    QUESTION_TEMPLATES
        .iter()
        .map(|template| template.replacen("{}", &snippet, 1))
        .collect()
}

fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SUMMARY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(SUMMARY_SNIPPET_CHARS).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::QUESTIONS_PER_INPUT;

    #[test]
    fn test_response_is_identity() {
        assert_eq!(derive_response("Hello"), "Hello");
        assert_eq!(derive_response(""), "");
    }

    #[test]
    fn test_summary_contains_prefix_and_input() {
        let s = derive_agent_summary("Hello");
        assert!(s.starts_with(AGENT_SUMMARY_PREFIX));
        assert!(s.contains("Hello"));
    }

    #[test]
    fn test_summary_truncates_long_input_on_char_boundary() {
        let long: String = "é".repeat(100);
        let s = derive_agent_summary(&long);
        assert!(s.ends_with('…'));
        assert!(s.chars().count() < 100);
    }

    #[test]
    fn test_exactly_three_questions() {
        let qs = derive_questions("X");
        assert_eq!(qs.len(), QUESTIONS_PER_INPUT);
        for q in &qs {
            assert!(q.contains('X'), "question should embed the input: {q}");
        }
    }

    #[test]
    fn test_derivations_are_deterministic() {
        assert_eq!(derive_questions("same"), derive_questions("same"));
        assert_eq!(derive_agent_summary("same"), derive_agent_summary("same"));
    }
}
