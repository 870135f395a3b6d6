// file: src/models/query.rs
// description: structured query model and its engine DSL serialization
// reference: https://opensearch.org/docs/latest/query-dsl/

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

/// Field name the engine expands to every indexed field.
pub const ALL_FIELDS: &str = "_all";

/// Result-size limit applied when a query does not carry one.
pub const DEFAULT_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOperator {
    And,
    Or,
}

impl MatchOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOperator::And => "and",
            MatchOperator::Or => "or",
        }
    }
}

/// Bounds of a range expression; unset sides are left open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeBounds {
    pub gt: Option<Value>,
    pub gte: Option<Value>,
    pub lt: Option<Value>,
    pub lte: Option<Value>,
}

impl RangeBounds {
    fn to_json(&self) -> Value {
        let mut bounds = Map::new();
        for (name, bound) in [
            ("gt", &self.gt),
            ("gte", &self.gte),
            ("lt", &self.lt),
            ("lte", &self.lte),
        ] {
            if let Some(value) = bound {
                bounds.insert(name.to_string(), value.clone());
            }
        }
        Value::Object(bounds)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpression {
    Match {
        field: String,
        text: String,
        operator: MatchOperator,
    },
    Term {
        field: String,
        value: Value,
    },
    Range {
        field: String,
        bounds: RangeBounds,
    },
    Bool {
        must: Vec<QueryExpression>,
        should: Vec<QueryExpression>,
        must_not: Vec<QueryExpression>,
        filter: Vec<QueryExpression>,
    },
    QueryString {
        text: String,
        default_field: String,
    },
}

impl QueryExpression {
    pub fn match_all_fields(text: impl Into<String>) -> Self {
        QueryExpression::Match {
            field: ALL_FIELDS.to_string(),
            text: text.into(),
            operator: MatchOperator::And,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            QueryExpression::Match {
                field,
                text,
                operator,
            } => json!({
                "match": {
                    field.as_str(): {
                        "query": text,
                        "operator": operator.as_str(),
                    }
                }
            }),
            QueryExpression::Term { field, value } => json!({
                "term": { field.as_str(): value }
            }),
            QueryExpression::Range { field, bounds } => json!({
                "range": { field.as_str(): bounds.to_json() }
            }),
            QueryExpression::Bool {
                must,
                should,
                must_not,
                filter,
            } => {
                let mut clauses = Map::new();
                for (name, list) in [
                    ("must", must),
                    ("should", should),
                    ("must_not", must_not),
                    ("filter", filter),
                ] {
                    if !list.is_empty() {
                        clauses.insert(
                            name.to_string(),
                            Value::Array(list.iter().map(QueryExpression::to_json).collect()),
                        );
                    }
                }
                json!({ "bool": clauses })
            }
            QueryExpression::QueryString {
                text,
                default_field,
            } => json!({
                "query_string": {
                    "query": text,
                    "default_field": default_field,
                }
            }),
        }
    }
}

/// Canonical conversion output: an expression tree plus paging.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredQuery {
    pub query: QueryExpression,
    pub size: Option<usize>,
    pub from: Option<usize>,
}

impl StructuredQuery {
    pub fn new(query: QueryExpression) -> Self {
        Self {
            query,
            size: Some(DEFAULT_SIZE),
            from: None,
        }
    }

    pub fn with_from(mut self, from: usize) -> Self {
        self.from = Some(from);
        self
    }

    pub fn effective_size(&self) -> usize {
        self.size.unwrap_or(DEFAULT_SIZE)
    }

    pub fn to_json(&self) -> Value {
        let mut document = Map::new();
        document.insert("query".to_string(), self.query.to_json());
        document.insert("size".to_string(), json!(self.effective_size()));
        if let Some(from) = self.from {
            document.insert("from".to_string(), json!(from));
        }
        Value::Object(document)
    }
}

impl Serialize for StructuredQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
