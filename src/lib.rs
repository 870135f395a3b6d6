// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod converter;
pub mod error;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod search;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{Config, ConversionConfig, SearchConfig};
pub use converter::{
    BedrockTransport, ConversionStrategy, ModelConverter, ModelTransport, PatternConverter,
    QueryAnalysis, QueryConversionService,
};
pub use error::{ConversionError, QueryError, Result};
pub use models::{QueryExpression, RawHit, SearchResult, StructuredQuery};
pub use output::TerminalPresenter;
pub use pipeline::{QueryOutcome, QueryPipeline};
pub use search::{OpenSearchClient, ResultMapper, SearchBackend, SearchResponse};
pub use utils::{OperationTimer, Validator};
