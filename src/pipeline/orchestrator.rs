// file: src/pipeline/orchestrator.rs
// description: coordinates query conversion, search execution, and result mapping
// reference: orchestrates one query cycle end to end

use crate::config::Config;
use crate::converter::{ConversionStrategy, QueryConversionService};
use crate::error::Result;
use crate::models::SearchResult;
use crate::search::{OpenSearchClient, ResultMapper, SearchBackend};
use crate::utils::OperationTimer;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SLOW_PHASE: Duration = Duration::from_secs(5);

/// Everything one query cycle produced, for the presentation layer.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: String,
    pub dsl: String,
    pub results: Vec<SearchResult>,
    pub total_hits: u64,
    pub elapsed: Duration,
}

pub struct QueryPipeline {
    converter: QueryConversionService,
    backend: Arc<dyn SearchBackend>,
    index: String,
}

impl QueryPipeline {
    pub fn new(
        converter: QueryConversionService,
        backend: Arc<dyn SearchBackend>,
        index: impl Into<String>,
    ) -> Self {
        Self {
            converter,
            backend,
            index: index.into(),
        }
    }

    /// Builds the conversion service and engine client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let converter = QueryConversionService::from_config(&config.conversion)?;
        let backend = OpenSearchClient::new(&config.search)?;
        Ok(Self::new(converter, Arc::new(backend), config.search.index.clone()))
    }

    pub fn strategy(&self) -> ConversionStrategy {
        self.converter.strategy()
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub async fn run(&self, query: &str) -> Result<QueryOutcome> {
        let total = OperationTimer::new("query");

        info!("[1/3] Converting natural language to query DSL");
        debug!("Natural language query: {}", query);
        let timer = OperationTimer::new("conversion");
        let dsl = self.converter.convert_to_dsl(query).await?;
        timer.warn_if_slow(SLOW_PHASE);
        timer.finish();

        info!("[2/3] Executing query against index {}", self.index);
        let timer = OperationTimer::new("search");
        let response = self.backend.search(&dsl, &self.index).await?;
        timer.warn_if_slow(SLOW_PHASE);
        timer.finish();

        info!("[3/3] Mapping {} hits", response.hits.len());
        let results = ResultMapper::map(response.hits);

        Ok(QueryOutcome {
            query: query.to_string(),
            dsl,
            total_hits: response.total,
            elapsed: total.finish_with_count(results.len()),
            results,
        })
    }
}
