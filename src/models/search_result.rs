// file: src/models/search_result.rs
// description: raw engine hits and normalized search results
// reference: OpenSearch _search response hit format

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One hit exactly as the engine returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,

    /// Absent for pure filter queries.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    #[serde(rename = "_source", default)]
    pub source: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document identifier
    pub id: String,

    /// Relevance score, if the engine scored the hit
    pub score: Option<f64>,

    /// Source document fields
    pub source: HashMap<String, Value>,
}

impl SearchResult {
    pub fn new(id: String, score: Option<f64>, source: HashMap<String, Value>) -> Self {
        Self { id, score, source }
    }

    pub fn source_json(&self) -> String {
        serde_json::to_string(&self.source).unwrap_or_else(|_| "{}".to_string())
    }
}
