// file: src/converter/transport.rs
// description: HTTP transport for remote model invocation
// reference: https://docs.aws.amazon.com/bedrock/latest/APIReference/API_runtime_InvokeModel.html

use crate::config::ConversionConfig;
use crate::error::{ConversionError, QueryError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Sends an invocation body to a model and returns the raw response body.
/// Credentials and signing are the implementation's concern.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn invoke(&self, model_id: &str, body: &Value) -> Result<String, ConversionError>;
}

pub struct BedrockTransport {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl BedrockTransport {
    pub fn new(config: &ConversionConfig) -> Result<Self, QueryError> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                QueryError::ClientInitialization(format!("Failed to build model client: {}", e))
            })?;

        let base_url = match config.model_host.as_deref().filter(|h| !h.trim().is_empty()) {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
                host.trim_end_matches('/').to_string()
            }
            Some(host) => format!("https://{}", host.trim_end_matches('/')),
            None => format!(
                "https://bedrock-runtime.{}.amazonaws.com",
                config.effective_model_region()
            ),
        };

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            timeout,
        })
    }

    pub fn endpoint_for(&self, model_id: &str) -> String {
        format!("{}/model/{}/invoke", self.base_url, model_id)
    }
}

#[async_trait]
impl ModelTransport for BedrockTransport {
    async fn invoke(&self, model_id: &str, body: &Value) -> Result<String, ConversionError> {
        let url = self.endpoint_for(model_id);
        debug!("Invoking model at {}", url);

        let mut request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ConversionError::Timeout(self.timeout)
            } else {
                ConversionError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ConversionError::Timeout(self.timeout)
            } else {
                ConversionError::Transport(format!("Failed to read model response: {}", e))
            }
        })?;

        if status != StatusCode::OK {
            return Err(ConversionError::RemoteStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
