use super::{expect_leaf, leaf_fragment, CriterionHandler};
use crate::criterion::{Criterion, CriterionKind, Operand, Target, Value};
use crate::fulltext::escape_like;
use crate::search::converter::ConversionContext;
use crate::search::query_builder::{Condition, Join, QueryFragment};
use crate::{Error, Result};

/// Location id, parent location id and subtree criteria. Each renders as a
/// semi-join on `location`, so content with several locations matches once.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationHandler;

fn location_join() -> Join {
    Join::new("location", "content_id", "id")
}

impl CriterionHandler for LocationHandler {
    fn name(&self) -> &'static str {
        "location"
    }

    fn kinds(&self) -> &'static [CriterionKind] {
        &[
            CriterionKind::LocationId,
            CriterionKind::ParentLocationId,
            CriterionKind::SubtreeId,
        ]
    }

    fn handle(
        &self,
        criterion: &Criterion,
        _children: Vec<QueryFragment>,
        _ctx: &ConversionContext,
    ) -> Result<QueryFragment> {
        let leaf = expect_leaf(self, criterion)?;
        let filter = match leaf.target() {
            Target::LocationId => leaf_fragment("id", leaf)?,
            Target::ParentLocationId => leaf_fragment("parent_id", leaf)?,
            Target::SubtreeId => {
                let paths: Vec<&Value> = match leaf.operand() {
                    Operand::Single(v) => vec![v],
                    Operand::List(vs) => vs.iter().collect(),
                    Operand::Range(..) => {
                        return Err(Error::arity(leaf.target(), leaf.operator(), "expects path prefixes"))
                    }
                };
                let prefixes = paths
                    .into_iter()
                    .map(|path| match path.as_text() {
                        Some(p) => Ok(QueryFragment::from(Condition::Like {
                            column: "path_string",
                            pattern: format!("{}%", escape_like(p)),
                        })),
                        None => Err(Error::InvalidCriterionValue(format!(
                            "SubtreeId expects path strings, got {}",
                            path
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                QueryFragment::or(prefixes)
            }
            _ => return Err(Error::NoHandlerFound(criterion.to_string())),
        };

        if filter.is_match_none() {
            return Ok(QueryFragment::MatchNone);
        }
        Ok(QueryFragment::join(location_join(), filter))
    }
}
