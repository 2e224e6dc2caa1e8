use super::{QueryBuilder, SearchHandler};
use crate::config::SearchConfig;
use crate::criterion::Criterion;
use crate::field_index::ConverterRegistry;
use crate::fulltext::FullTextAnalyzer;
use crate::gateway::{SearchGateway, SqlGateway};
use crate::models::{ContentSummary, SearchResult, SortClause};
use crate::search::converter::CriteriaConverter;
use crate::search::handlers::{default_handlers, CriterionHandler};
use crate::search::mapper::Mapper;
use crate::{Error, Result};
use std::sync::Arc;

impl SearchHandler {
    /// Create a search handler with the stock handler set.
    pub fn new(
        gateway: Arc<dyn SearchGateway>,
        analyzer: Arc<FullTextAnalyzer>,
        converters: Arc<ConverterRegistry>,
    ) -> Result<Self> {
        let handlers = default_handlers(converters.clone(), analyzer.clone());
        Self::with_handlers(gateway, analyzer, converters, handlers)
    }

    /// Create a search handler with a custom handler set. Fails with
    /// `ConflictingHandlers` if two handlers claim the same criterion kind.
    pub fn with_handlers(
        gateway: Arc<dyn SearchGateway>,
        analyzer: Arc<FullTextAnalyzer>,
        converters: Arc<ConverterRegistry>,
        handlers: Vec<Arc<dyn CriterionHandler>>,
    ) -> Result<Self> {
        Ok(Self {
            gateway,
            converter: CriteriaConverter::new(handlers)?,
            converters,
            analyzer,
        })
    }

    /// Connect to the configured store and build the default handler.
    pub async fn connect(config: &SearchConfig) -> Result<Self> {
        let gateway = SqlGateway::connect(&config.database).await?;
        let analyzer = FullTextAnalyzer::from_config(config.full_text.clone())?;
        Self::new(
            Arc::new(gateway),
            Arc::new(analyzer),
            Arc::new(ConverterRegistry::with_defaults()),
        )
    }

    /// Search for content.
    ///
    /// `count` in the result is the number of distinct matches for
    /// `criterion`, independent of `offset` and `limit`. A `limit` of
    /// `None` returns every match from `offset` on.
    #[tracing::instrument(skip_all, fields(criterion = %criterion, offset = offset, limit = ?limit))]
    pub async fn find(
        &self,
        criterion: &Criterion,
        offset: u64,
        limit: Option<u64>,
        sort: &[SortClause],
    ) -> Result<SearchResult> {
        let ctx = self.resolve_context(criterion, sort).await?;
        let predicate = self.converter.convert(criterion, &ctx)?;
        if predicate.is_match_none() {
            tracing::debug!("Criterion matches nothing; skipping store");
            return Ok(SearchResult::empty());
        }

        let resolved_sort = self.resolve_sort(sort, &ctx)?;
        let query = QueryBuilder::new(predicate)
            .with_sort(resolved_sort)
            .with_window(offset, limit);

        let count = self.count_total(&query).await?;
        if count == 0 || limit == Some(0) {
            return Ok(SearchResult {
                content: Vec::new(),
                count,
            });
        }

        let ids = self.fetch_page(&query).await?;
        let rows = self.load_rows(&ids).await?;
        let content = Mapper::map(rows)?;

        tracing::debug!(count, returned = content.len(), "Search completed");
        Ok(SearchResult { content, count })
    }

    /// Return the single content item matching `criterion`. Zero or several
    /// matches fail with `InvalidResultCount` carrying the actual count.
    #[tracing::instrument(skip_all, fields(criterion = %criterion))]
    pub async fn find_single(&self, criterion: &Criterion) -> Result<ContentSummary> {
        let result = self.find(criterion, 0, Some(1), &[]).await?;
        if result.count != 1 {
            return Err(Error::InvalidResultCount {
                count: result.count,
            });
        }
        result
            .content
            .into_iter()
            .next()
            .ok_or(Error::InvalidResultCount { count: 0 })
    }
}
