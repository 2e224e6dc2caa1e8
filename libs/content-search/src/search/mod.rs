//! Criterion search: handlers, conversion, SQL building and execution.

mod converter;
mod engine;
pub mod handlers;
mod mapper;
pub mod query_builder;

pub use converter::{ConversionContext, CriteriaConverter};
pub use engine::SearchHandler;
pub use handlers::{default_handlers, CriterionHandler};
pub use mapper::Mapper;
pub use query_builder::{QueryBuilder, QueryFragment, SqlStatement};
