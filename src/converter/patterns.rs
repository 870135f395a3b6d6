// file: src/converter/patterns.rs
// description: compiled regex patterns for natural-language query analysis
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Imperative lead-ins, longest alternatives first so "find all" wins over "find"
    pub static ref LEAD_IN: Regex = Regex::new(
        r"^(?:find all|search for|show me|find|get|list|search)(?:\s+|$)"
    ).expect("LEAD_IN regex is valid");

    // Everything from the first filter keyword to the end of the text; group 1 is the condition
    pub static ref TRAILING_FILTER_CLAUSE: Regex = Regex::new(
        r"(?is)\s(?:where|with|that|having)\s(.+)$"
    ).expect("TRAILING_FILTER_CLAUSE regex is valid");

    // Filter detection
    pub static ref FILTER_KEYWORD: Regex = Regex::new(
        r"(?i)(?:where|with|that|having) .+"
    ).expect("FILTER_KEYWORD regex is valid");

    pub static ref RANGE_KEYWORD: Regex = Regex::new(
        r"(?i)(?:between|from|after|before|greater than|less than|>=|<=|>|<) .+"
    ).expect("RANGE_KEYWORD regex is valid");

    // Filter extraction
    pub static ref COMPARISON: Regex = Regex::new(
        r"(?i)\b([a-z_][\w.]*)\s*(?:(?:is|are|was|were)\s+)?(>=|<=|>|<|(?:greater than|less than|after|before)\b)\s*([^\s,;]+)"
    ).expect("COMPARISON regex is valid");

    pub static ref BETWEEN: Regex = Regex::new(
        r"(?i)\b([a-z_][\w.]*)\s+(?:(?:is|are|was|were)\s+)?between\s+([^\s,;]+)\s+and\s+([^\s,;]+)"
    ).expect("BETWEEN regex is valid");
}

pub fn strip_lead_in(text: &str) -> &str {
    match LEAD_IN.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

pub fn strip_trailing_filter(text: &str) -> &str {
    match TRAILING_FILTER_CLAUSE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

/// Condition text following the first filter keyword, if any.
pub fn filter_clause(text: &str) -> Option<&str> {
    TRAILING_FILTER_CLAUSE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn has_filter_hint(text: &str) -> bool {
    FILTER_KEYWORD.is_match(text) || RANGE_KEYWORD.is_match(text)
}
