use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of characters of SQL text carried in log lines and error contexts.
pub const SQL_PREVIEW_LEN: usize = 100;

/// PII patterns for sanitizing SQL text before it reaches a log line.
///
/// ### WARNING
/// Regex-based scrubbing is **best-effort**. Literal values concatenated into
/// SQL in unusual ways can slip through; prefer bind parameters for client data.
static PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}", "[EMAIL]"),
        // US SSN: XXX-XX-XXXX
        (r"\b\d{3}-\d{2}-\d{4}\b", "[SSN]"),
        // 13-16 digits, optionally grouped by hyphens or spaces
        (r"\b(?:\d[ -]*?){13,16}\b", "[CREDIT_CARD]"),
        (r"(?:\+?1[-. ]?)?\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}", "[PHONE]"),
    ]
    .into_iter()
    .filter_map(|(pattern, label)| Regex::new(pattern).ok().map(|re| (re, label)))
    .collect()
});

static WHITESPACE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s+").ok());

pub fn scrub(input: &str) -> String {
    PATTERNS
        .iter()
        .fold(input.to_string(), |acc, (re, label)| {
            re.replace_all(&acc, *label).into_owned()
        })
}

/// Single-line, scrubbed, truncated rendering of a statement for logs.
pub fn sql_preview(sql: &str) -> String {
    let collapsed = match WHITESPACE.as_ref() {
        Some(re) => re.replace_all(sql.trim(), " ").into_owned(),
        None => sql.split_whitespace().collect::<Vec<_>>().join(" "),
    };
    let scrubbed = scrub(&collapsed);

    if scrubbed.chars().count() <= SQL_PREVIEW_LEN {
        return scrubbed;
    }
    let mut preview: String = scrubbed.chars().take(SQL_PREVIEW_LEN).collect();
    preview.push_str("...");
    preview
}
