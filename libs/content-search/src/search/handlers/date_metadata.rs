use super::{expect_leaf, leaf_fragment, CriterionHandler};
use crate::criterion::{Criterion, CriterionKind, DateTarget, Target};
use crate::search::converter::ConversionContext;
use crate::search::query_builder::QueryFragment;
use crate::{Error, Result};

/// Created/modified timestamps (unix seconds). `BETWEEN` is inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateMetadataHandler;

impl CriterionHandler for DateMetadataHandler {
    fn name(&self) -> &'static str {
        "date_metadata"
    }

    fn kinds(&self) -> &'static [CriterionKind] {
        &[CriterionKind::DateMetadata]
    }

    fn handle(
        &self,
        criterion: &Criterion,
        _children: Vec<QueryFragment>,
        _ctx: &ConversionContext,
    ) -> Result<QueryFragment> {
        let leaf = expect_leaf(self, criterion)?;
        let column = match leaf.target() {
            Target::DateMetadata(DateTarget::Created) => "created",
            Target::DateMetadata(DateTarget::Modified) => "modified",
            _ => return Err(Error::NoHandlerFound(criterion.to_string())),
        };
        leaf_fragment(column, leaf)
    }
}
