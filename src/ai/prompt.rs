//! Prompt text and output cleanup for query generation

use once_cell::sync::Lazy;
use regex::Regex;

/// Instructions sent as the system message
pub const SYSTEM_PROMPT: &str = r#"You translate a plain-language description of what someone is looking for into a single advanced web search query.

Use search operators where they help: site:, -site:, filetype:, intitle:, inurl:, quoted phrases, OR and -word exclusions.

Return ONLY the query on one line. No explanations, no markdown, no surrounding quotes."#;

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").unwrap());
static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(search\s+)?query\s*:\s*").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// User message for a description
pub fn user_prompt(description: &str) -> String {
    format!("Description: {}", description.trim())
}

/// Reduce a provider answer to a bare query string
pub fn clean_output(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    if let Some(caps) = FENCE.captures(&text) {
        text = caps[1].to_string();
    }
    text = LABEL.replace(&text, "").to_string();
    text = text.trim_matches('`').trim().to_string();
    text = strip_wrapping_quotes(text.trim());

    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

// Only a single wrapping pair is removed; inner phrase quotes stay.
fn strip_wrapping_quotes(text: &str) -> String {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            let inner = &text[1..text.len() - 1];
            if !inner.contains(quote) {
                return inner.to_string();
            }
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answer_untouched() {
        assert_eq!(clean_output("site:gov filetype:pdf budget"), "site:gov filetype:pdf budget");
    }

    #[test]
    fn test_code_fence_removed() {
        let raw = "```text\nintitle:\"index of\" mp3\n```";
        assert_eq!(clean_output(raw), "intitle:\"index of\" mp3");
    }

    #[test]
    fn test_label_and_backticks_removed() {
        assert_eq!(clean_output("Query: `site:edu thesis`"), "site:edu thesis");
    }

    #[test]
    fn test_wrapping_quotes_removed_only_when_whole() {
        assert_eq!(clean_output("\"site:edu thesis\""), "site:edu thesis");
        assert_eq!(clean_output("\"annual report\" \"2023\""), "\"annual report\" \"2023\"");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(clean_output("site:gov\n  filetype:pdf\t budget "), "site:gov filetype:pdf budget");
    }

    #[test]
    fn test_user_prompt_trims() {
        assert_eq!(user_prompt("  pdf reports "), "Description: pdf reports");
    }
}
