// file: src/converter/pattern.rs
// description: deterministic rule-based natural language to query conversion
// reference: handles common query shapes without a remote model

use crate::converter::patterns::{
    BETWEEN, COMPARISON, filter_clause, has_filter_hint, strip_lead_in, strip_trailing_filter,
};
use crate::error::Result;
use crate::models::{ALL_FIELDS, QueryExpression, RangeBounds, StructuredQuery};
use crate::utils::Validator;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Placeholder match text when nothing is left after stripping.
pub const WILDCARD: &str = "*";

/// Intermediate view of a query before it is assembled into a document.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnalysis {
    pub match_text: String,
    pub has_filter: bool,
    pub filters: Vec<QueryExpression>,
}

#[derive(Debug, Clone, Default)]
pub struct PatternConverter;

impl PatternConverter {
    pub fn new() -> Self {
        Self
    }

    /// Converts free text into a structured query. Never fails: text that
    /// cannot form a match query degrades to a `query_string` wrapper.
    pub fn convert(&self, text: &str) -> StructuredQuery {
        debug!("Converting query with patterns: {}", text);

        match self.try_convert(text) {
            Ok(query) => query,
            Err(e) => {
                warn!("Pattern conversion failed ({}), using query_string fallback", e);
                Self::fallback(text)
            }
        }
    }

    pub fn analyze(&self, text: &str) -> QueryAnalysis {
        let trimmed = text.trim();

        let stripped = strip_trailing_filter(strip_lead_in(trimmed)).trim();
        let match_text = if stripped.is_empty() {
            WILDCARD.to_string()
        } else {
            stripped.to_string()
        };

        // Ranges are only read from the condition after a filter keyword;
        // range wording elsewhere stays part of the match text.
        let has_filter = has_filter_hint(trimmed);
        let filters = if has_filter {
            filter_clause(trimmed).map(extract_filters).unwrap_or_default()
        } else {
            Vec::new()
        };

        QueryAnalysis {
            match_text,
            has_filter,
            filters,
        }
    }

    fn try_convert(&self, text: &str) -> Result<StructuredQuery> {
        Validator::validate_query_text(text)?;

        let analysis = self.analyze(text);
        if analysis.has_filter && analysis.filters.is_empty() {
            debug!("Filter wording detected but no comparison could be extracted");
        }

        Ok(StructuredQuery::new(QueryExpression::Bool {
            must: vec![QueryExpression::match_all_fields(analysis.match_text)],
            should: Vec::new(),
            must_not: Vec::new(),
            filter: analysis.filters,
        }))
    }

    pub fn fallback(text: &str) -> StructuredQuery {
        StructuredQuery::new(QueryExpression::QueryString {
            text: text.to_string(),
            default_field: ALL_FIELDS.to_string(),
        })
    }
}

fn extract_filters(clause: &str) -> Vec<QueryExpression> {
    let mut filters = Vec::new();

    for caps in BETWEEN.captures_iter(clause) {
        filters.push(QueryExpression::Range {
            field: caps[1].to_string(),
            bounds: RangeBounds {
                gte: Some(parse_operand(&caps[2])),
                lte: Some(parse_operand(&caps[3])),
                ..Default::default()
            },
        });
    }

    for caps in COMPARISON.captures_iter(clause) {
        let value = Some(parse_operand(&caps[3]));
        let bounds = match caps[2].to_lowercase().as_str() {
            ">" | "greater than" | "after" => RangeBounds {
                gt: value,
                ..Default::default()
            },
            ">=" => RangeBounds {
                gte: value,
                ..Default::default()
            },
            "<" | "less than" | "before" => RangeBounds {
                lt: value,
                ..Default::default()
            },
            "<=" => RangeBounds {
                lte: value,
                ..Default::default()
            },
            _ => continue,
        };

        filters.push(QueryExpression::Range {
            field: caps[1].to_string(),
            bounds,
        });
    }

    filters
}

fn parse_operand(raw: &str) -> Value {
    let raw = raw.trim_matches(|c| c == '"' || c == '\'');
    if let Ok(n) = raw.parse::<i64>() {
        return json!(n);
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => json!(n),
        _ => json!(raw),
    }
}
