// file: src/converter/mod.rs
// description: natural language to query conversion module exports
// reference: internal module structure

pub mod model;
pub mod pattern;
pub mod patterns;
pub mod service;
pub mod transport;

pub use model::ModelConverter;
pub use pattern::{PatternConverter, QueryAnalysis};
pub use service::{ConversionStrategy, QueryConversionService};
pub use transport::{BedrockTransport, ModelTransport};
