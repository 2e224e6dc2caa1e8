use super::{expect_leaf, leaf_fragment, CriterionHandler};
use crate::criterion::{Criterion, CriterionKind};
use crate::search::converter::ConversionContext;
use crate::search::query_builder::{Join, QueryFragment};
use crate::Result;

/// Content type group membership, through the type/group link table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentTypeGroupHandler;

impl CriterionHandler for ContentTypeGroupHandler {
    fn name(&self) -> &'static str {
        "content_type_group"
    }

    fn kinds(&self) -> &'static [CriterionKind] {
        &[CriterionKind::ContentTypeGroupId]
    }

    fn handle(
        &self,
        criterion: &Criterion,
        _children: Vec<QueryFragment>,
        _ctx: &ConversionContext,
    ) -> Result<QueryFragment> {
        let leaf = expect_leaf(self, criterion)?;
        let filter = leaf_fragment("group_id", leaf)?;
        if filter.is_match_none() {
            return Ok(QueryFragment::MatchNone);
        }
        Ok(QueryFragment::join(
            Join::new("content_type_group_link", "content_type_id", "content_type_id"),
            filter,
        ))
    }
}
