//! Criterion handlers, one per criterion kind.
//!
//! A handler claims a set of [`CriterionKind`]s and turns a criterion of
//! those kinds into a [`QueryFragment`]. Handlers hold only immutable
//! collaborators; everything a single search needs arrives through
//! [`ConversionContext`].

mod content;
mod content_type_group;
mod date_metadata;
mod field;
mod full_text;
mod location;
mod logical;

pub use content::ContentColumnHandler;
pub use content_type_group::ContentTypeGroupHandler;
pub use date_metadata::DateMetadataHandler;
pub use field::FieldHandler;
pub use full_text::FullTextHandler;
pub use location::LocationHandler;
pub use logical::{LogicalAndHandler, LogicalNotHandler, LogicalOrHandler};

use super::converter::ConversionContext;
use super::query_builder::{Comparison, Condition, QueryFragment};
use crate::criterion::{Criterion, CriterionKind, LeafCriterion, Operand, Operator, Value};
use crate::field_index::ConverterRegistry;
use crate::fulltext::{escape_like, FullTextAnalyzer, WILDCARD};
use crate::{Error, Result};
use std::sync::Arc;

pub trait CriterionHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Criterion kinds this handler claims. No two registered handlers may
    /// claim the same kind.
    fn kinds(&self) -> &'static [CriterionKind];

    fn accepts(&self, criterion: &Criterion) -> bool {
        self.kinds().contains(&criterion.kind())
    }

    /// `children` holds the already converted children of a combinator and is
    /// empty for leaves.
    fn handle(
        &self,
        criterion: &Criterion,
        children: Vec<QueryFragment>,
        ctx: &ConversionContext,
    ) -> Result<QueryFragment>;
}

/// The stock handler set covering every criterion kind.
pub fn default_handlers(
    converters: Arc<ConverterRegistry>,
    analyzer: Arc<FullTextAnalyzer>,
) -> Vec<Arc<dyn CriterionHandler>> {
    vec![
        Arc::new(ContentColumnHandler),
        Arc::new(LocationHandler),
        Arc::new(ContentTypeGroupHandler),
        Arc::new(DateMetadataHandler),
        Arc::new(FieldHandler::new(converters)),
        Arc::new(FullTextHandler::new(analyzer)),
        Arc::new(LogicalAndHandler),
        Arc::new(LogicalOrHandler),
        Arc::new(LogicalNotHandler),
    ]
}

fn expect_leaf<'a>(handler: &dyn CriterionHandler, criterion: &'a Criterion) -> Result<&'a LeafCriterion> {
    criterion
        .as_leaf()
        .ok_or_else(|| Error::NoHandlerFound(format!("{} cannot handle {}", handler.name(), criterion)))
}

/// Plain column predicate for a validated leaf.
fn leaf_condition(column: &'static str, leaf: &LeafCriterion) -> Result<Condition> {
    let single = || match leaf.operand() {
        Operand::Single(v) => Ok(v.clone()),
        _ => Err(Error::arity(leaf.target(), leaf.operator(), "expects a single value")),
    };
    let compare = |op: Comparison| -> Result<Condition> {
        Ok(Condition::Compare {
            column,
            op,
            value: single()?,
        })
    };

    match leaf.operator() {
        Operator::Eq => compare(Comparison::Eq),
        Operator::Gt => compare(Comparison::Gt),
        Operator::Gte => compare(Comparison::Gte),
        Operator::Lt => compare(Comparison::Lt),
        Operator::Lte => compare(Comparison::Lte),
        Operator::In => match leaf.operand() {
            Operand::List(values) => Ok(Condition::In {
                column,
                values: values.clone(),
            }),
            _ => Err(Error::arity(leaf.target(), leaf.operator(), "expects a list of values")),
        },
        Operator::Between => match leaf.operand() {
            Operand::Range(low, high) => Ok(Condition::Between {
                column,
                low: low.clone(),
                high: high.clone(),
            }),
            _ => Err(Error::arity(leaf.target(), leaf.operator(), "expects exactly 2 values")),
        },
        Operator::Like => match single()? {
            Value::Text(pattern) => Ok(Condition::Like {
                column,
                pattern: like_pattern(&pattern),
            }),
            Value::Int(_) => Err(Error::InvalidCriterionValue(format!(
                "{} LIKE expects a text pattern",
                leaf.target()
            ))),
        },
    }
}

/// Like [`leaf_condition`]; an empty `IN` list becomes `MatchNone`.
fn leaf_fragment(column: &'static str, leaf: &LeafCriterion) -> Result<QueryFragment> {
    match leaf_condition(column, leaf)? {
        Condition::In { values, .. } if values.is_empty() => Ok(QueryFragment::MatchNone),
        condition => Ok(condition.into()),
    }
}

/// `*` in a user LIKE pattern is the wildcard; SQL metacharacters are literal.
fn like_pattern(pattern: &str) -> String {
    escape_like(pattern).replace(WILDCARD, "%")
}
