//! Render query fragments to parameterized SQL.
//!
//! Every join becomes a correlated `EXISTS` semi-join on its own alias, so a
//! content row is never multiplied by one-to-many relations.

use super::bind::{push_text, push_value};
use super::fragment::{Condition, JoinedFilter, QueryFragment};
use super::BindValue;

pub(super) struct Renderer<'a> {
    bind_params: &'a mut Vec<BindValue>,
    alias_counter: usize,
}

impl<'a> Renderer<'a> {
    pub(super) fn new(bind_params: &'a mut Vec<BindValue>) -> Self {
        Self {
            bind_params,
            alias_counter: 0,
        }
    }

    /// `alias` names the relation conditions apply to; `parent_alias` the one
    /// correlated conditions point at.
    pub(super) fn render(&mut self, fragment: &QueryFragment, alias: &str, parent_alias: &str) -> String {
        match fragment {
            QueryFragment::MatchAll => "1 = 1".to_string(),
            QueryFragment::MatchNone => "1 = 0".to_string(),
            QueryFragment::Condition(condition) => self.render_condition(condition, alias, parent_alias),
            QueryFragment::Join(joined) => self.render_join(joined, alias),
            QueryFragment::And(children) => self.render_list(children, " AND ", alias, parent_alias),
            QueryFragment::Or(children) => self.render_list(children, " OR ", alias, parent_alias),
            QueryFragment::Not(inner) => format!("NOT ({})", self.render(inner, alias, parent_alias)),
        }
    }

    fn render_list(
        &mut self,
        children: &[QueryFragment],
        separator: &str,
        alias: &str,
        parent_alias: &str,
    ) -> String {
        let parts: Vec<String> = children
            .iter()
            .map(|c| self.render(c, alias, parent_alias))
            .collect();
        format!("({})", parts.join(separator))
    }

    fn render_join(&mut self, joined: &JoinedFilter, parent_alias: &str) -> String {
        self.alias_counter += 1;
        let alias = format!("j{}", self.alias_counter);
        let join = &joined.join;

        let mut clauses = vec![format!(
            "{}.{} = {}.{}",
            alias, join.column, parent_alias, join.parent_column
        )];
        for discriminator in &join.discriminators {
            clauses.push(self.render_condition(discriminator, &alias, parent_alias));
        }
        if joined.filter != QueryFragment::MatchAll {
            clauses.push(self.render(&joined.filter, &alias, parent_alias));
        }

        format!(
            "EXISTS (SELECT 1 FROM {} {} WHERE {})",
            join.table,
            alias,
            clauses.join(" AND ")
        )
    }

    fn render_condition(&mut self, condition: &Condition, alias: &str, parent_alias: &str) -> String {
        match condition {
            Condition::Compare { column, op, value } => {
                let idx = push_value(self.bind_params, value);
                format!("{}.{} {} ${}", alias, column, op.as_sql(), idx)
            }
            Condition::In { column, values } => {
                if values.is_empty() {
                    return "1 = 0".to_string();
                }
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| format!("${}", push_value(self.bind_params, v)))
                    .collect();
                format!("{}.{} IN ({})", alias, column, placeholders.join(", "))
            }
            Condition::Between { column, low, high } => {
                let low_idx = push_value(self.bind_params, low);
                let high_idx = push_value(self.bind_params, high);
                format!(
                    "{}.{} BETWEEN ${} AND ${}",
                    alias, column, low_idx, high_idx
                )
            }
            Condition::Like { column, pattern } => {
                let idx = push_text(self.bind_params, pattern.clone());
                format!("{}.{} LIKE ${} ESCAPE '\\'", alias, column, idx)
            }
            Condition::Correlated {
                column,
                parent_column,
            } => format!("{}.{} = {}.{}", alias, column, parent_alias, parent_column),
        }
    }
}
