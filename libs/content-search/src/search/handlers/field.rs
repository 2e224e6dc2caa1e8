use super::{expect_leaf, leaf_fragment, CriterionHandler};
use crate::criterion::{Criterion, CriterionKind, LeafCriterion, Target, Value};
use crate::field_index::{ConverterRegistry, IndexColumn};
use crate::search::converter::ConversionContext;
use crate::search::query_builder::{Condition, Join, QueryFragment};
use crate::{Error, Result};
use std::sync::Arc;

/// Field value criteria. The field type's registered converter decides which
/// sort-key column is compared; the join is scoped to the field definition
/// and the content's current version.
#[derive(Debug, Clone)]
pub struct FieldHandler {
    converters: Arc<ConverterRegistry>,
}

impl FieldHandler {
    pub fn new(converters: Arc<ConverterRegistry>) -> Self {
        Self { converters }
    }
}

pub(crate) fn field_join(field_definition_ids: &[i64]) -> Join {
    Join::new("content_field", "content_id", "id")
        .discriminated_by(Condition::In {
            column: "field_definition_id",
            values: field_definition_ids.iter().copied().map(Value::Int).collect(),
        })
        .discriminated_by(Condition::Correlated {
            column: "version",
            parent_column: "current_version",
        })
}

fn check_value_types(leaf: &LeafCriterion, column: IndexColumn) -> Result<()> {
    for value in leaf.operand().values() {
        let fits = match value {
            Value::Int(_) => column.is_integer(),
            Value::Text(_) => !column.is_integer(),
        };
        if !fits {
            return Err(Error::InvalidCriterionValue(format!(
                "{} is indexed on {}, got {}",
                leaf.target(),
                column,
                value
            )));
        }
    }
    Ok(())
}

impl CriterionHandler for FieldHandler {
    fn name(&self) -> &'static str {
        "field"
    }

    fn kinds(&self) -> &'static [CriterionKind] {
        &[CriterionKind::Field]
    }

    fn handle(
        &self,
        criterion: &Criterion,
        _children: Vec<QueryFragment>,
        ctx: &ConversionContext,
    ) -> Result<QueryFragment> {
        let leaf = expect_leaf(self, criterion)?;
        let Target::Field(target) = leaf.target() else {
            return Err(Error::NoHandlerFound(criterion.to_string()));
        };

        let mut joins = Vec::new();
        for definition in ctx.field_definitions(target)? {
            let column = self.converters.index_column(&definition.data_type)?;
            check_value_types(leaf, column)?;
            let filter = leaf_fragment(column.column_name(), leaf)?;
            if filter.is_match_none() {
                continue;
            }
            joins.push(QueryFragment::join(field_join(&[definition.id]), filter));
        }

        Ok(QueryFragment::or(joins))
    }
}
