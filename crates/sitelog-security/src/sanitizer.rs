use regex::Regex;
use sitelog_core::SitelogResult;
use std::sync::LazyLock;

/// Maximum length, in characters, of a generally sanitized string.
pub const MAX_INPUT_LENGTH: usize = 1000;
/// Maximum length, in characters, of sanitized comment/description content.
pub const MAX_CONTENT_LENGTH: usize = 2000;
/// Maximum length of a sanitized upload file name.
pub const MAX_FILE_NAME_LENGTH: usize = 100;

#[allow(clippy::expect_used)]
static DANGEROUS_SCHEMES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)javascript:|data:|vbscript:").expect("invalid scheme pattern")
});

#[allow(clippy::expect_used)]
static SCRIPT_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:script|javascript|vbscript|onload|onerror|onclick)\b")
        .expect("invalid script word pattern")
});

#[allow(clippy::expect_used)]
static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("invalid underscore pattern"));

/// Sanitize free-form user input.
///
/// Removes `<` and `>`, strips every case-insensitive `javascript:`, `data:`
/// and `vbscript:`, trims surrounding whitespace and caps the result at
/// [`MAX_INPUT_LENGTH`] characters. The output is a fixed point:
/// `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(input: &str) -> String {
    let mut cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect();

    // Removing one occurrence can splice another together ("javajavascript:script:").
    while DANGEROUS_SCHEMES.is_match(&cleaned) {
        cleaned = DANGEROUS_SCHEMES.replace_all(&cleaned, "").into_owned();
    }

    truncate_chars(cleaned.trim(), MAX_INPUT_LENGTH)
        .trim_end()
        .to_string()
}

/// Sanitize an arbitrary JSON value coming from a form or API payload.
///
/// `null` becomes the empty string, strings are sanitized directly and every
/// other value is rendered as JSON text first.
pub fn sanitize_value(input: &serde_json::Value) -> String {
    match input {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => sanitize(s),
        other => sanitize(&other.to_string()),
    }
}

/// Parse `raw` as JSON and sanitize the resulting value.
///
/// Text that is not valid JSON is an error, not something to sanitize.
pub fn sanitize_json(raw: &str) -> SitelogResult<String> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    Ok(sanitize_value(&value))
}

/// Sanitize comment and description text.
///
/// Applies [`sanitize`], then drops the standalone words `script`,
/// `javascript`, `vbscript`, `onload`, `onerror` and `onclick`.
pub fn sanitize_content(text: &str) -> String {
    let base = sanitize(text);
    let stripped = SCRIPT_WORDS.replace_all(&base, "");
    truncate_chars(stripped.trim(), MAX_CONTENT_LENGTH).to_string()
}

/// Produce a storage-safe file name. Never rejects.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    truncate_chars(&collapsed, MAX_FILE_NAME_LENGTH).to_string()
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_input_unchanged() {
        assert_eq!(sanitize("Concrete pour on level 3"), "Concrete pour on level 3");
    }

    #[test]
    fn test_angle_brackets_removed() {
        assert_eq!(sanitize("<b>bold</b>"), "bbold/b");
    }

    #[test]
    fn test_schemes_stripped_case_insensitive() {
        assert_eq!(sanitize("JavaScript:alert(1)"), "alert(1)");
        assert_eq!(sanitize("x DATA:y VbScript:z"), "x y z");
    }

    #[test]
    fn test_spliced_scheme_stripped() {
        assert_eq!(sanitize("javajavascript:script:go"), "go");
    }

    #[test]
    fn test_whitespace_exposed_by_stripping_is_trimmed() {
        assert_eq!(sanitize("  javascript: hello  "), "hello");
    }

    #[test]
    fn test_truncates_to_limit() {
        let long = "a".repeat(MAX_INPUT_LENGTH + 50);
        assert_eq!(sanitize(&long).chars().count(), MAX_INPUT_LENGTH);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let long = "é".repeat(MAX_INPUT_LENGTH + 1);
        let out = sanitize(&long);
        assert_eq!(out.chars().count(), MAX_INPUT_LENGTH);
    }

    #[test]
    fn test_value_inputs() {
        assert_eq!(sanitize_value(&json!(null)), "");
        assert_eq!(sanitize_value(&json!(42)), "42");
        assert_eq!(sanitize_value(&json!(true)), "true");
        assert_eq!(sanitize_value(&json!(" <hi> ")), "hi");
        assert_eq!(sanitize_value(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_content_strips_script_words() {
        assert_eq!(
            sanitize_content("nice onclick photo SCRIPT here"),
            "nice  photo  here"
        );
    }

    #[test]
    fn test_content_keeps_words_containing_keywords() {
        assert_eq!(sanitize_content("manuscript scripted"), "manuscript scripted");
    }

    #[test]
    fn test_content_word_boundaries_are_unicode() {
        // Accented letters are word characters, so the keyword is part of a longer word.
        assert_eq!(sanitize_content("éscript ok"), "éscript ok");
        assert_eq!(sanitize_content("naïveonclick"), "naïveonclick");
        // Punctuation still delimits.
        assert_eq!(sanitize_content("-script ok"), "- ok");
    }

    #[test]
    fn test_sanitize_json_parses_then_sanitizes() {
        assert_eq!(sanitize_json("null").unwrap(), "");
        assert_eq!(sanitize_json(r#"" <b>hi</b> ""#).unwrap(), "bhi/b");
        assert_eq!(sanitize_json("42").unwrap(), "42");
    }

    #[test]
    fn test_sanitize_json_rejects_malformed_input() {
        let err = sanitize_json("{not json").unwrap_err();
        assert!(matches!(err, sitelog_core::SitelogError::Json(_)));
    }

    #[test]
    fn test_file_name_replaces_and_collapses() {
        assert_eq!(sanitize_file_name("my report (final).pdf"), "my_report_final_.pdf");
        assert_eq!(sanitize_file_name("a   b"), "a_b");
        assert_eq!(sanitize_file_name("ok-name.v2.png"), "ok-name.v2.png");
    }

    #[test]
    fn test_file_name_truncated() {
        let name = format!("{}.png", "x".repeat(200));
        assert_eq!(sanitize_file_name(&name).len(), MAX_FILE_NAME_LENGTH);
    }

    #[test]
    fn test_file_name_non_ascii() {
        assert_eq!(sanitize_file_name("relatório.pdf"), "relat_rio.pdf");
    }
}
