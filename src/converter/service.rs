// file: src/converter/service.rs
// description: conversion strategy selection and canonical DSL output
// reference: strategy fixed once from configuration

use crate::config::ConversionConfig;
use crate::converter::model::ModelConverter;
use crate::converter::pattern::PatternConverter;
use crate::error::{ConversionError, QueryError};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStrategy {
    PatternBased,
    ModelBased,
}

impl ConversionStrategy {
    /// Model conversion needs both the flag and a model identifier.
    pub fn resolve(config: &ConversionConfig) -> Self {
        if config.use_model && config.model_id().is_some() {
            ConversionStrategy::ModelBased
        } else {
            ConversionStrategy::PatternBased
        }
    }
}

impl fmt::Display for ConversionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionStrategy::PatternBased => write!(f, "pattern-based"),
            ConversionStrategy::ModelBased => write!(f, "model-based"),
        }
    }
}

enum Converter {
    Pattern(PatternConverter),
    Model(ModelConverter),
}

pub struct QueryConversionService {
    converter: Converter,
}

impl QueryConversionService {
    pub fn from_config(config: &ConversionConfig) -> Result<Self, QueryError> {
        let service = match ConversionStrategy::resolve(config) {
            ConversionStrategy::ModelBased => {
                Self::model_based(ModelConverter::from_config(config)?)
            }
            ConversionStrategy::PatternBased => Self::pattern_based(),
        };
        Ok(service)
    }

    pub fn pattern_based() -> Self {
        info!("Using pattern-based query conversion");
        Self {
            converter: Converter::Pattern(PatternConverter::new()),
        }
    }

    pub fn model_based(converter: ModelConverter) -> Self {
        info!(
            "Using model-based query conversion with model: {}",
            converter.model_id()
        );
        Self {
            converter: Converter::Model(converter),
        }
    }

    pub fn strategy(&self) -> ConversionStrategy {
        match self.converter {
            Converter::Pattern(_) => ConversionStrategy::PatternBased,
            Converter::Model(_) => ConversionStrategy::ModelBased,
        }
    }

    /// Converts text to a pretty-printed query document.
    pub async fn convert_to_dsl(&self, text: &str) -> Result<String, ConversionError> {
        let raw = match &self.converter {
            Converter::Pattern(converter) => {
                serde_json::to_string(&converter.convert(text)).map_err(|e| {
                    ConversionError::Failed(format!("Failed to encode query: {}", e))
                })?
            }
            Converter::Model(converter) => converter.convert(text).await?,
        };

        let dsl = canonicalize(&raw)?;
        debug!("Generated DSL: {}", dsl);
        Ok(dsl)
    }
}

/// Re-parses a query document and pretty-prints it. The document must be a
/// JSON object.
pub fn canonicalize(raw: &str) -> Result<String, ConversionError> {
    let document: Value = serde_json::from_str(raw)
        .map_err(|e| ConversionError::Failed(format!("Query document is not valid JSON: {}", e)))?;

    if !document.is_object() {
        return Err(ConversionError::Failed(
            "Query document must be a JSON object".to_string(),
        ));
    }

    serde_json::to_string_pretty(&document)
        .map_err(|e| ConversionError::Failed(format!("Failed to format query document: {}", e)))
}
