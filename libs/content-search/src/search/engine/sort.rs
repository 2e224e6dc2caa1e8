use super::SearchHandler;
use crate::models::{SortClause, SortTarget};
use crate::search::converter::ConversionContext;
use crate::search::query_builder::{ResolvedSort, ResolvedSortKey};
use crate::{Error, Result};

impl SearchHandler {
    pub(super) fn resolve_sort(
        &self,
        sort: &[SortClause],
        ctx: &ConversionContext,
    ) -> Result<Vec<ResolvedSort>> {
        let mut out = Vec::with_capacity(sort.len());
        for clause in sort {
            let key = match &clause.target {
                SortTarget::ContentId => ResolvedSortKey::Column("id"),
                SortTarget::ContentName => ResolvedSortKey::Column("name"),
                SortTarget::DateCreated => ResolvedSortKey::Column("created"),
                SortTarget::DateModified => ResolvedSortKey::Column("modified"),
                SortTarget::SectionId => ResolvedSortKey::Column("section_id"),
                SortTarget::ContentTypeId => ResolvedSortKey::Column("content_type_id"),
                SortTarget::Field(target) => {
                    let definitions = ctx.field_definitions(target)?;
                    let mut column = None;
                    for definition in definitions {
                        let next = self.converters.index_column(&definition.data_type)?;
                        match column {
                            Some(existing) if existing != next => {
                                return Err(Error::InvalidCriterionValue(format!(
                                    "cannot sort on {}: definitions use different index columns",
                                    target
                                )));
                            }
                            _ => column = Some(next),
                        }
                    }
                    let Some(column) = column else {
                        return Err(Error::FieldNotFound {
                            content_type: target.content_type.clone(),
                            field: target.field.clone(),
                        });
                    };
                    ResolvedSortKey::Field {
                        field_definition_ids: definitions.iter().map(|d| d.id).collect(),
                        column,
                    }
                }
            };
            out.push(ResolvedSort {
                key,
                direction: clause.direction,
            });
        }
        Ok(out)
    }
}
