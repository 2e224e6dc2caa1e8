//! Criteria-based content search
//!
//! Translates a tree of search criteria into SQL over a relational content
//! store, with:
//! - Pluggable criterion handlers, one per criterion kind
//! - Full-text search with configurable character transformation rules
//! - Field criteria resolved through field type index bindings
//! - Counted, sorted and windowed result pages

#![allow(
    clippy::large_enum_variant, // Criterion variants are kept unboxed for pattern matching
)]

pub mod config;
pub mod criterion;
pub mod error;
pub mod field_index;
pub mod fulltext;
pub mod gateway;
pub mod models;
pub mod search;

pub use config::SearchConfig;
pub use criterion::{
    ContentStatus, Criterion, CriterionKind, DateTarget, FieldTarget, LogicalOperator, Operand,
    Operator, Target, Value,
};
pub use error::{Error, Result};
pub use field_index::{ConverterRegistry, FieldValueConverter, IndexColumn};
pub use fulltext::{FullTextAnalyzer, TransformationProcessor};
pub use gateway::{SearchGateway, SqlGateway};
pub use models::{ContentSummary, SearchResult, SortClause, SortDirection, SortTarget};
pub use search::{CriteriaConverter, CriterionHandler, SearchHandler};
