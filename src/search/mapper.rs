// file: src/search/mapper.rs
// description: normalizes raw engine hits into search results

use crate::models::{RawHit, SearchResult};

impl From<RawHit> for SearchResult {
    fn from(hit: RawHit) -> Self {
        SearchResult::new(hit.id, hit.score, hit.source)
    }
}

/// Keeps the engine's order; no sorting, deduplication or filtering.
pub struct ResultMapper;

impl ResultMapper {
    pub fn map(hits: Vec<RawHit>) -> Vec<SearchResult> {
        hits.into_iter().map(SearchResult::from).collect()
    }
}
