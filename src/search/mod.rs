// file: src/search/mod.rs
// description: search execution and result normalization module exports
// reference: internal module structure

pub mod client;
pub mod mapper;

pub use client::{OpenSearchClient, SearchBackend, SearchResponse};
pub use mapper::ResultMapper;
