// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod query;
pub mod search_result;

pub use query::{
    ALL_FIELDS, DEFAULT_SIZE, MatchOperator, QueryExpression, RangeBounds, StructuredQuery,
};
pub use search_result::{RawHit, SearchResult};
