//! Search handler - criterion conversion and query execution
//!
//! The SearchHandler is responsible for:
//! - Resolving field definitions and word frequencies a criterion needs
//! - Converting the criterion tree into one predicate
//! - Running the count, page and load queries through the gateway
//! - Folding loaded rows into content summaries

use crate::field_index::ConverterRegistry;
use crate::fulltext::FullTextAnalyzer;
use crate::gateway::SearchGateway;
use crate::search::converter::CriteriaConverter;
use crate::search::query_builder;
use std::sync::Arc;

pub use query_builder::QueryBuilder;

mod api;
mod execute;
mod resolve;
mod sort;

/// Executes criterion searches against one content store.
///
/// Immutable after construction; concurrent `find` calls share nothing but
/// the gateway's connection pool.
#[derive(Clone)]
pub struct SearchHandler {
    gateway: Arc<dyn SearchGateway>,
    converter: CriteriaConverter,
    converters: Arc<ConverterRegistry>,
    analyzer: Arc<FullTextAnalyzer>,
}

impl std::fmt::Debug for SearchHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHandler")
            .field("converter", &self.converter)
            .field("converters", &self.converters)
            .field("analyzer", &self.analyzer)
            .finish_non_exhaustive()
    }
}
