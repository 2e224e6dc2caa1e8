use super::{QueryBuilder, SearchHandler};
use crate::models::ContentRow;
use crate::Result;

impl SearchHandler {
    pub(super) async fn count_total(&self, query: &QueryBuilder) -> Result<i64> {
        let statement = query.build_count_sql();
        self.gateway.count(&statement).await
    }

    pub(super) async fn fetch_page(&self, query: &QueryBuilder) -> Result<Vec<i64>> {
        let statement = query.build_page_sql();
        self.gateway.fetch_ids(&statement).await
    }

    pub(super) async fn load_rows(&self, ids: &[i64]) -> Result<Vec<ContentRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let statement = QueryBuilder::build_load_sql(ids);
        self.gateway.fetch_rows(&statement).await
    }
}
