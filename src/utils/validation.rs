// file: src/utils/validation.rs
// description: input validation utilities and helpers
// reference: input validation patterns

use crate::error::{QueryError, Result};

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(QueryError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Index names follow the engine's rules: lowercase, no path separators
    /// or wildcard characters, and no leading `-`, `_` or `+`.
    pub fn validate_index_name(index: &str) -> Result<()> {
        if index.trim().is_empty() {
            return Err(QueryError::Validation("Index name is empty".to_string()));
        }

        if index.starts_with(['-', '_', '+']) {
            return Err(QueryError::Validation(format!(
                "Index name cannot start with '-', '_' or '+': {}",
                index
            )));
        }

        const FORBIDDEN: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#'];
        if index.contains(FORBIDDEN) || index.chars().any(|c| c.is_uppercase()) {
            return Err(QueryError::Validation(format!(
                "Invalid index name: {}",
                index
            )));
        }

        Ok(())
    }

    /// Rejects text carrying control characters other than ordinary whitespace.
    pub fn validate_query_text(text: &str) -> Result<()> {
        if let Some(c) = text
            .chars()
            .find(|c| c.is_control() && !c.is_whitespace())
        {
            return Err(QueryError::Validation(format!(
                "Query contains control character U+{:04X}",
                c as u32
            )));
        }
        Ok(())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((idx, _)) => format!("{}...", &text[..idx]),
        }
    }
}
