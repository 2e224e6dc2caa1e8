use super::CriterionHandler;
use crate::criterion::{Criterion, CriterionKind};
use crate::search::converter::ConversionContext;
use crate::search::query_builder::QueryFragment;
use crate::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalAndHandler;

impl CriterionHandler for LogicalAndHandler {
    fn name(&self) -> &'static str {
        "logical_and"
    }

    fn kinds(&self) -> &'static [CriterionKind] {
        &[CriterionKind::LogicalAnd]
    }

    fn handle(
        &self,
        _criterion: &Criterion,
        children: Vec<QueryFragment>,
        _ctx: &ConversionContext,
    ) -> Result<QueryFragment> {
        Ok(QueryFragment::and(children))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalOrHandler;

impl CriterionHandler for LogicalOrHandler {
    fn name(&self) -> &'static str {
        "logical_or"
    }

    fn kinds(&self) -> &'static [CriterionKind] {
        &[CriterionKind::LogicalOr]
    }

    fn handle(
        &self,
        _criterion: &Criterion,
        children: Vec<QueryFragment>,
        _ctx: &ConversionContext,
    ) -> Result<QueryFragment> {
        Ok(QueryFragment::or(children))
    }
}

/// Negates the conjunction of all children.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalNotHandler;

impl CriterionHandler for LogicalNotHandler {
    fn name(&self) -> &'static str {
        "logical_not"
    }

    fn kinds(&self) -> &'static [CriterionKind] {
        &[CriterionKind::LogicalNot]
    }

    fn handle(
        &self,
        _criterion: &Criterion,
        children: Vec<QueryFragment>,
        _ctx: &ConversionContext,
    ) -> Result<QueryFragment> {
        Ok(QueryFragment::not(children))
    }
}
