// file: src/search/client.rs
// description: OpenSearch-compatible REST client executing query documents
// reference: https://opensearch.org/docs/latest/api-reference/search/

use crate::config::SearchConfig;
use crate::error::{QueryError, Result};
use crate::models::RawHit;
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::{Client, Url, header};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Top-level document fields forwarded to the engine.
const FORWARDED_FIELDS: &[&str] = &["query", "size", "from"];

#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub hits: Vec<RawHit>,
    /// Total matching documents as reported by the engine.
    pub total: u64,
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, dsl: &str, index: &str) -> Result<SearchResponse>;
}

#[derive(Debug, Deserialize)]
struct EngineResponse {
    hits: EngineHits,
}

#[derive(Debug, Deserialize)]
struct EngineHits {
    #[serde(default)]
    total: Option<EngineTotal>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EngineTotal {
    Tracked { value: u64 },
    Count(u64),
}

#[derive(Clone)]
pub struct OpenSearchClient {
    client: Client,
    endpoint: Url,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
}

impl OpenSearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let raw = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| QueryError::Configuration("search endpoint is not set".to_string()))?;

        let endpoint = Url::parse(raw).map_err(|e| {
            QueryError::ClientInitialization(format!("Invalid search endpoint {}: {}", raw, e))
        })?;

        let client = Client::builder()
            .connect_timeout(config.connection_timeout())
            .timeout(config.socket_timeout())
            .build()
            .map_err(|e| {
                QueryError::ClientInitialization(format!("Failed to build search client: {}", e))
            })?;

        info!(
            "Search client initialized for host: {}",
            endpoint.host_str().unwrap_or_default()
        );

        Ok(Self {
            client,
            endpoint,
            username: config.username.clone(),
            password: config.password.clone(),
            timeout: config.socket_timeout(),
        })
    }

    /// Endpoint host without scheme or credentials, safe to log.
    pub fn host(&self) -> &str {
        self.endpoint.host_str().unwrap_or_default()
    }

    pub fn search_url(&self, index: &str) -> String {
        format!(
            "{}/{}/_search",
            self.endpoint.as_str().trim_end_matches('/'),
            index
        )
    }
}

#[async_trait]
impl SearchBackend for OpenSearchClient {
    async fn search(&self, dsl: &str, index: &str) -> Result<SearchResponse> {
        Validator::validate_index_name(index)?;

        let body = build_request_body(dsl)?;
        let url = self.search_url(index);
        debug!("Executing search on index: {} with body: {}", index, body);

        let mut request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&body);

        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                QueryError::SearchExecution(format!(
                    "search request timed out after {:?}",
                    self.timeout
                ))
            } else {
                QueryError::SearchExecution(format!("Failed to send search request: {}", e))
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            QueryError::SearchExecution(format!("Failed to read search response: {}", e))
        })?;

        if !status.is_success() {
            return Err(QueryError::SearchExecution(format!(
                "engine returned status {}: {}",
                status,
                Validator::truncate_text(&text, 500)
            )));
        }

        let parsed = parse_response(&text)?;
        info!(
            "Search completed. Found {} results ({} total)",
            parsed.hits.len(),
            parsed.total
        );
        Ok(parsed)
    }
}

/// Picks the engine-facing fields out of a query document.
pub fn build_request_body(dsl: &str) -> Result<Value> {
    let document: Value = serde_json::from_str(dsl)
        .map_err(|e| QueryError::SearchExecution(format!("Invalid query document: {}", e)))?;

    let Value::Object(fields) = document else {
        return Err(QueryError::SearchExecution(
            "Query document must be a JSON object".to_string(),
        ));
    };

    let body: Map<String, Value> = fields
        .into_iter()
        .filter(|(key, _)| FORWARDED_FIELDS.contains(&key.as_str()))
        .collect();

    Ok(Value::Object(body))
}

pub fn parse_response(body: &str) -> Result<SearchResponse> {
    let response: EngineResponse = serde_json::from_str(body)
        .map_err(|e| QueryError::SearchExecution(format!("Failed to parse search response: {}", e)))?;

    let hits = response.hits.hits;
    let total = match response.hits.total {
        Some(EngineTotal::Tracked { value }) => value,
        Some(EngineTotal::Count(count)) => count,
        None => hits.len() as u64,
    };

    Ok(SearchResponse { hits, total })
}
