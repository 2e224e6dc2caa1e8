use super::{expect_leaf, leaf_fragment, CriterionHandler};
use crate::criterion::{Criterion, CriterionKind, Target};
use crate::search::converter::ConversionContext;
use crate::search::query_builder::QueryFragment;
use crate::{Error, Result};

/// Criteria over columns of the content row itself: content id, content type
/// id, remote id, section id and status.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentColumnHandler;

impl ContentColumnHandler {
    fn column(target: &Target) -> Option<&'static str> {
        match target {
            Target::ContentId => Some("id"),
            Target::ContentTypeId => Some("content_type_id"),
            Target::RemoteId => Some("remote_id"),
            Target::SectionId => Some("section_id"),
            Target::Status => Some("status"),
            _ => None,
        }
    }
}

impl CriterionHandler for ContentColumnHandler {
    fn name(&self) -> &'static str {
        "content"
    }

    fn kinds(&self) -> &'static [CriterionKind] {
        &[
            CriterionKind::ContentId,
            CriterionKind::ContentTypeId,
            CriterionKind::RemoteId,
            CriterionKind::SectionId,
            CriterionKind::Status,
        ]
    }

    fn handle(
        &self,
        criterion: &Criterion,
        _children: Vec<QueryFragment>,
        _ctx: &ConversionContext,
    ) -> Result<QueryFragment> {
        let leaf = expect_leaf(self, criterion)?;
        let column = Self::column(leaf.target())
            .ok_or_else(|| Error::NoHandlerFound(criterion.to_string()))?;
        leaf_fragment(column, leaf)
    }
}
