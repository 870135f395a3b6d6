// file: src/converter/model.rs
// description: remote-model based natural language to query conversion
// reference: https://docs.aws.amazon.com/bedrock/latest/userguide/model-parameters-anthropic-claude-messages.html

use crate::config::ConversionConfig;
use crate::converter::transport::{BedrockTransport, ModelTransport};
use crate::error::{ConversionError, QueryError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.1;

const SYSTEM_PROMPT: &str = r#"You are an expert at converting natural language queries into OpenSearch DSL (Domain Specific Language) queries.

Your task is to convert user queries into valid OpenSearch query JSON format.

Rules:
1. Return ONLY valid JSON in OpenSearch DSL format
2. Use appropriate query types (match, match_phrase, term, terms, range, bool)
3. For text searches, prefer 'match' or 'match_phrase' queries
4. For exact matches, use 'term' or 'terms' queries
5. For date/number ranges, use 'range' queries
6. Combine multiple conditions using a 'bool' query with 'must', 'should', 'must_not' and 'filter'
7. Always include a 'size' parameter (default: 10)
8. Do not include any explanations, prose or markdown code fences, only the JSON

Example output format:
{
  "query": {
    "bool": {
      "must": [
        {
          "match": {
            "_all": {
              "query": "search terms",
              "operator": "and"
            }
          }
        }
      ]
    }
  },
  "size": 10
}
"#;

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    anthropic_version: &'static str,
    system: &'static str,
    messages: Vec<InvokeMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct InvokeMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

pub struct ModelConverter {
    transport: Arc<dyn ModelTransport>,
    model_id: String,
}

impl ModelConverter {
    pub fn new(transport: Arc<dyn ModelTransport>, model_id: impl Into<String>) -> Self {
        Self {
            transport,
            model_id: model_id.into(),
        }
    }

    pub fn from_config(config: &ConversionConfig) -> Result<Self, QueryError> {
        let model_id = config.model_id().ok_or_else(|| {
            QueryError::Configuration("model conversion requires a model_id".to_string())
        })?;
        let transport = BedrockTransport::new(config)?;

        info!(
            "Model client initialized with model: {} in region: {}",
            model_id,
            config.effective_model_region()
        );

        Ok(Self::new(Arc::new(transport), model_id))
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Returns the model's query document exactly as generated, minus any
    /// code fences, after checking that it parses as JSON.
    pub async fn convert(&self, text: &str) -> Result<String, ConversionError> {
        debug!("Converting query using model {}: {}", self.model_id, text);

        let body = build_request(text)?;
        let response = self
            .transport
            .invoke(&self.model_id, &body)
            .await
            .inspect_err(|e| error!("Model invocation failed: {}", e))?;

        let content = extract_text(&response)?;
        let cleaned = strip_code_fences(&content);

        serde_json::from_str::<Value>(cleaned)
            .map_err(|e| ConversionError::InvalidResponse(e.to_string()))?;

        debug!("Model generated DSL: {}", cleaned);
        Ok(cleaned.to_string())
    }
}

fn build_request(text: &str) -> Result<Value, ConversionError> {
    let request = InvokeRequest {
        anthropic_version: ANTHROPIC_VERSION,
        system: SYSTEM_PROMPT,
        messages: vec![InvokeMessage {
            role: "user",
            content: format!(
                "Convert the following natural language query to OpenSearch DSL:\n\n{}",
                text
            ),
        }],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    serde_json::to_value(&request)
        .map_err(|e| ConversionError::Failed(format!("Failed to encode model request: {}", e)))
}

/// Text of the first content block of a model response body.
pub fn extract_text(body: &str) -> Result<String, ConversionError> {
    let response: InvokeResponse = serde_json::from_str(body)
        .map_err(|e| ConversionError::MalformedResponse(e.to_string()))?;

    response
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ConversionError::EmptyResponse)
}

/// Removes a leading and a trailing markdown fence; each is optional.
pub fn strip_code_fences(content: &str) -> &str {
    let mut cleaned = content.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    struct StubTransport {
        response: Result<String, fn() -> ConversionError>,
        seen: Mutex<Vec<(String, Value)>>,
    }

    impl StubTransport {
        fn replying(body: Value) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(body.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn raw(body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(body.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: fn() -> ConversionError) -> Arc<Self> {
            Arc::new(Self {
                response: Err(err),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelTransport for StubTransport {
        async fn invoke(&self, model_id: &str, body: &Value) -> Result<String, ConversionError> {
            self.seen
                .lock()
                .unwrap()
                .push((model_id.to_string(), body.clone()));
            match &self.response {
                Ok(body) => Ok(body.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn reply_with_text(text: &str) -> Value {
        json!({ "id": "msg_1", "role": "assistant", "content": [{ "type": "text", "text": text }] })
    }

    #[tokio::test]
    async fn test_fenced_response_is_cleaned() {
        let dsl = r#"{"query":{"match":{"title":{"query":"rust"}}},"size":10}"#;
        let transport = StubTransport::replying(reply_with_text(&format!("```json\n{}\n```", dsl)));
        let converter = ModelConverter::new(transport, "test-model");

        let output = converter.convert("rust books").await.unwrap();
        assert_eq!(output, dsl);
        assert!(!output.contains("```"));
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["size"], json!(10));
    }

    #[tokio::test]
    async fn test_output_is_not_reserialized() {
        let dsl = "{\n  \"size\": 5,\n  \"query\": {\"match_all\": {}}\n}";
        let converter = ModelConverter::new(StubTransport::replying(reply_with_text(dsl)), "m");
        assert_eq!(converter.convert("everything").await.unwrap(), dsl);
    }

    #[tokio::test]
    async fn test_empty_content_list() {
        let transport = StubTransport::replying(json!({ "content": [] }));
        let converter = ModelConverter::new(transport, "m");
        let err = converter.convert("anything").await.unwrap_err();
        assert!(matches!(err, ConversionError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_block_without_text() {
        let transport = StubTransport::replying(json!({ "content": [{ "type": "tool_use" }] }));
        let converter = ModelConverter::new(transport, "m");
        let err = converter.convert("anything").await.unwrap_err();
        assert!(matches!(err, ConversionError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_non_json_text_is_invalid() {
        let transport =
            StubTransport::replying(reply_with_text("Sure! Here is your query: match everything"));
        let converter = ModelConverter::new(transport, "m");
        let err = converter.convert("anything").await.unwrap_err();
        assert!(matches!(err, ConversionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let converter = ModelConverter::new(StubTransport::raw("<html>502</html>"), "m");
        let err = converter.convert("anything").await.unwrap_err();
        assert!(matches!(err, ConversionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let converter = ModelConverter::new(
            StubTransport::failing(|| ConversionError::RemoteStatus {
                status: 429,
                body: "throttled".to_string(),
            }),
            "m",
        );
        let err = converter.convert("anything").await.unwrap_err();
        assert!(matches!(err, ConversionError::RemoteStatus { status: 429, .. }));

        let converter = ModelConverter::new(
            StubTransport::failing(|| ConversionError::Timeout(std::time::Duration::from_secs(30))),
            "m",
        );
        let err = converter.convert("anything").await.unwrap_err();
        assert!(matches!(err, ConversionError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_request_payload() {
        let transport = StubTransport::replying(reply_with_text("{}"));
        let converter = ModelConverter::new(transport.clone(), "anthropic.claude-v2");
        converter.convert("orders over 100 dollars").await.unwrap();

        let seen = transport.seen.lock().unwrap();
        let (model_id, body) = &seen[0];
        assert_eq!(model_id, "anthropic.claude-v2");
        assert_eq!(body["anthropic_version"], json!("bedrock-2023-05-31"));
        assert_eq!(body["max_tokens"], json!(1000));
        assert!(body["system"].as_str().unwrap().contains("'size'"));
        assert_eq!(body["messages"][0]["role"], json!("user"));
        assert!(
            body["messages"][0]["content"]
                .as_str()
                .unwrap()
                .ends_with("orders over 100 dollars")
        );
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{}"), "{}");
        assert_eq!(strip_code_fences("{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {\"size\": 3}  "), "{\"size\": 3}");
    }
}
