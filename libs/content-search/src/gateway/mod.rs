//! Backing-store seam consumed by the search engine.

mod sql;

pub use sql::SqlGateway;

use crate::criterion::FieldTarget;
use crate::models::{ContentRow, FieldDefinition};
use crate::search::query_builder::SqlStatement;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Executes rendered statements and answers the lookups the engine needs
/// before conversion. Store errors are returned as-is; no retries.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Run a `SELECT COUNT(...)` statement.
    async fn count(&self, statement: &SqlStatement) -> Result<i64>;

    /// Run a statement selecting one id column, preserving row order.
    async fn fetch_ids(&self, statement: &SqlStatement) -> Result<Vec<i64>>;

    /// Run a content load statement, preserving row order.
    async fn fetch_rows(&self, statement: &SqlStatement) -> Result<Vec<ContentRow>>;

    async fn field_definitions(&self, target: &FieldTarget) -> Result<Vec<FieldDefinition>>;

    /// Corpus document frequency per word. Words missing from the index are
    /// absent from the map.
    async fn word_frequencies(&self, words: &[String]) -> Result<HashMap<String, u64>>;
}
