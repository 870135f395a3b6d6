// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{QueryError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Flat environment variables accepted as highest-precedence overrides,
/// mapped onto their nested configuration keys.
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("OPENSEARCH_ENDPOINT", "search.endpoint"),
    ("OPENSEARCH_INDEX", "search.index"),
    ("MAX_RESULTS", "search.max_results"),
    ("CONNECTION_TIMEOUT", "search.connection_timeout_ms"),
    ("SOCKET_TIMEOUT", "search.socket_timeout_ms"),
    ("AWS_REGION", "conversion.region"),
    ("USE_LLM_CONVERSION", "conversion.use_model"),
    ("BEDROCK_MODEL_ID", "conversion.model_id"),
    ("BEDROCK_REGION", "conversion.model_region"),
    ("BEDROCK_API_KEY", "conversion.api_key"),
];

/// Legacy variables that must parse as non-negative integers.
const LEGACY_NUMERIC_VARS: &[&str] = &["MAX_RESULTS", "CONNECTION_TIMEOUT", "SOCKET_TIMEOUT"];

/// Legacy variables that must parse as booleans.
const LEGACY_BOOLEAN_VARS: &[&str] = &["USE_LLM_CONVERSION"];

/// Filters a legacy override value. Blank values are ignored, and values of
/// the wrong type are dropped with a warning so the lower layers apply.
fn legacy_override(var: &str, raw: Option<String>) -> Option<String> {
    let value = raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())?;

    if LEGACY_NUMERIC_VARS.contains(&var) && value.parse::<u64>().is_err() {
        warn!("Ignoring {}={:?}: expected an integer", var, value);
        return None;
    }

    let is_boolean = matches!(
        value.to_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "1" | "0"
    );
    if LEGACY_BOOLEAN_VARS.contains(&var) && !is_boolean {
        warn!("Ignoring {}={:?}: expected true or false", var, value);
        return None;
    }

    Some(value)
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: Option<String>,
    pub index: String,
    pub max_results: usize,
    pub connection_timeout_ms: u64,
    pub socket_timeout_ms: u64,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            index: "documents".to_string(),
            max_results: 10,
            connection_timeout_ms: 5_000,
            socket_timeout_ms: 10_000,
            username: None,
            password: None,
        }
    }
}

impl SearchConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub use_model: bool,
    pub model_id: Option<String>,
    pub region: String,
    pub model_region: Option<String>,
    pub model_host: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            use_model: false,
            model_id: Some("anthropic.claude-3-sonnet-20240229-v1:0".to_string()),
            region: "us-east-1".to_string(),
            model_region: None,
            model_host: None,
            api_key: None,
            timeout_ms: 30_000,
        }
    }
}

impl ConversionConfig {
    /// Region used for the model endpoint, falling back to the general region.
    pub fn effective_model_region(&self) -> &str {
        self.model_region
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(&self.region)
    }

    /// Model identifier, if one is configured and non-blank.
    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NL_SEARCH")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in LEGACY_ENV_OVERRIDES {
            let value = legacy_override(var, std::env::var(var).ok());
            builder = builder
                .set_override_option(*key, value)
                .map_err(|e| QueryError::Configuration(e.to_string()))?;
        }

        let settings = builder
            .build()
            .map_err(|e| QueryError::Configuration(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| QueryError::Configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// The search endpoint; configuration is rejected at load time without one.
    pub fn endpoint(&self) -> Result<&str> {
        self.search
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                QueryError::Configuration(
                    "search endpoint must be set (search.endpoint or OPENSEARCH_ENDPOINT)"
                        .to_string(),
                )
            })
    }

    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint()?;
        Validator::validate_url(endpoint)
            .map_err(|e| QueryError::Configuration(e.to_string()))?;

        Validator::validate_index_name(&self.search.index)
            .map_err(|e| QueryError::Configuration(e.to_string()))?;

        if self.search.max_results == 0 {
            return Err(QueryError::Configuration(
                "max_results must be greater than 0".to_string(),
            ));
        }

        if self.search.socket_timeout_ms == 0 || self.conversion.timeout_ms == 0 {
            return Err(QueryError::Configuration(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn with_endpoint() -> Config {
        let mut config = Config::default_config();
        config.search.endpoint = Some("https://search.example.com".to_string());
        config
    }

    #[test]
    fn test_missing_endpoint_fails_fast() {
        let config = Config::default_config();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, QueryError::Configuration(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_blank_endpoint_rejected() {
        let mut config = Config::default_config();
        config.search.endpoint = Some("   ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let mut config = Config::default_config();
        config.search.endpoint = Some("search.example.com".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = with_endpoint();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.index, "documents");
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.search.connection_timeout(), Duration::from_secs(5));
        assert!(!config.conversion.use_model);
    }

    #[test]
    fn test_model_region_falls_back_to_region() {
        let mut conversion = ConversionConfig::default();
        conversion.region = "eu-west-1".to_string();
        assert_eq!(conversion.effective_model_region(), "eu-west-1");

        conversion.model_region = Some("us-west-2".to_string());
        assert_eq!(conversion.effective_model_region(), "us-west-2");
    }

    #[test]
    fn test_blank_model_id_is_absent() {
        let mut conversion = ConversionConfig::default();
        conversion.model_id = Some("  ".to_string());
        assert_eq!(conversion.model_id(), None);
    }

    #[test]
    fn test_legacy_override_ignores_unparseable_values() {
        assert_eq!(legacy_override("MAX_RESULTS", Some("abc".to_string())), None);
        assert_eq!(legacy_override("SOCKET_TIMEOUT", Some("-5".to_string())), None);
        assert_eq!(
            legacy_override("CONNECTION_TIMEOUT", Some(" 2500 ".to_string())),
            Some("2500".to_string())
        );
        assert_eq!(legacy_override("USE_LLM_CONVERSION", Some("maybe".to_string())), None);
        assert_eq!(
            legacy_override("USE_LLM_CONVERSION", Some("TRUE".to_string())),
            Some("TRUE".to_string())
        );
        assert_eq!(legacy_override("OPENSEARCH_INDEX", Some("   ".to_string())), None);
        assert_eq!(legacy_override("OPENSEARCH_INDEX", None), None);
        assert_eq!(
            legacy_override("OPENSEARCH_ENDPOINT", Some("http://localhost:9200".to_string())),
            Some("http://localhost:9200".to_string())
        );
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nl_search.toml");
        fs::write(
            &path,
            r#"
[search]
endpoint = "http://localhost:9200"
index = "articles"
max_results = 3

[conversion]
use_model = true
model_id = "anthropic.claude-3-haiku-20240307-v1:0"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.endpoint().unwrap(), "http://localhost:9200");
        assert_eq!(config.search.max_results, 3);
        assert!(config.conversion.use_model);
        assert_eq!(config.conversion.timeout_ms, 30_000);
    }
}
