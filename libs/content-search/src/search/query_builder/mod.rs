//! SQL query builder for content searches.
//!
//! Builds the three statements a search runs:
//! - the count over the full predicate
//! - the ordered, windowed page of content ids
//! - the row load for the ids of one page

mod bind;
mod fragment;
mod render;

use crate::field_index::IndexColumn;
use crate::models::SortDirection;
use bind::push_int;
use render::Renderer;

pub use fragment::{Comparison, Condition, Join, JoinedFilter, QueryFragment};

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Int(i64),
    Text(String),
}

/// Rendered SQL with its `$n` bind values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSortKey {
    /// Column of the content table.
    Column(&'static str),
    /// Current-version value of a field, on the field type's index column.
    Field {
        field_definition_ids: Vec<i64>,
        column: IndexColumn,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSort {
    pub key: ResolvedSortKey,
    pub direction: SortDirection,
}

pub(crate) const CONTENT_ALIAS: &str = "c";

/// Stores take LIMIT/OFFSET as signed 64-bit integers.
const MAX_WINDOW: u64 = i64::MAX as u64;

const LOAD_COLUMNS: &str = "c.id, c.content_type_id, c.section_id, c.status, c.remote_id, c.name, \
     c.current_version, c.created, c.modified, \
     l.id AS location_id, l.parent_id AS location_parent_id, \
     l.path_string AS location_path_string, l.depth AS location_depth, \
     f.id AS field_id, f.field_definition_id AS field_definition_id, \
     f.data_type AS field_data_type, f.language_code AS field_language_code, \
     f.sort_key_string AS field_sort_key_string, f.sort_key_int AS field_sort_key_int";

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    predicate: QueryFragment,
    sort: Vec<ResolvedSort>,
    offset: u64,
    limit: Option<u64>,
}

impl QueryBuilder {
    pub fn new(predicate: QueryFragment) -> Self {
        Self {
            predicate,
            sort: Vec::new(),
            offset: 0,
            limit: None,
        }
    }

    pub fn with_sort(mut self, sort: Vec<ResolvedSort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_window(mut self, offset: u64, limit: Option<u64>) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// Count of distinct matching content items; ignores the window.
    pub fn build_count_sql(&self) -> SqlStatement {
        let mut bind_params = Vec::new();
        let where_clause = self.render_predicate(&mut bind_params);
        SqlStatement {
            sql: format!(
                "SELECT COUNT(DISTINCT c.id) FROM content c WHERE {}",
                where_clause
            ),
            binds: bind_params,
        }
    }

    /// Ordered page of matching content ids. The content id is always the
    /// last sort key so paging is deterministic.
    pub fn build_page_sql(&self) -> SqlStatement {
        let mut bind_params = Vec::new();
        let where_clause = self.render_predicate(&mut bind_params);

        let mut sql = format!("SELECT c.id FROM content c WHERE {}", where_clause);
        self.push_order_by(&mut sql, &mut bind_params);

        let limit = self.limit.map_or(MAX_WINDOW, |l| l.min(MAX_WINDOW));
        let offset = self.offset.min(MAX_WINDOW);
        sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        SqlStatement {
            sql,
            binds: bind_params,
        }
    }

    /// Load content rows for `ids`, one row per location/field combination,
    /// ordered by position in `ids`, then location id, then field id.
    pub fn build_load_sql(ids: &[i64]) -> SqlStatement {
        let mut bind_params = Vec::new();
        if ids.is_empty() {
            return SqlStatement {
                sql: format!("SELECT {} FROM content c LEFT JOIN location l ON 1 = 0 LEFT JOIN content_field f ON 1 = 0 WHERE 1 = 0", LOAD_COLUMNS),
                binds: bind_params,
            };
        }

        let placeholders: Vec<usize> = ids.iter().map(|id| push_int(&mut bind_params, *id)).collect();
        let in_list: Vec<String> = placeholders.iter().map(|idx| format!("${}", idx)).collect();
        let positions: Vec<String> = placeholders
            .iter()
            .enumerate()
            .map(|(pos, idx)| format!("WHEN ${} THEN {}", idx, pos))
            .collect();

        let sql = format!(
            "SELECT {} FROM content c \
             LEFT JOIN location l ON l.content_id = c.id \
             LEFT JOIN content_field f ON f.content_id = c.id AND f.version = c.current_version \
             WHERE c.id IN ({}) \
             ORDER BY CASE c.id {} END, l.id, f.id",
            LOAD_COLUMNS,
            in_list.join(", "),
            positions.join(" ")
        );

        SqlStatement {
            sql,
            binds: bind_params,
        }
    }

    fn render_predicate(&self, bind_params: &mut Vec<BindValue>) -> String {
        Renderer::new(bind_params).render(&self.predicate, CONTENT_ALIAS, CONTENT_ALIAS)
    }

    fn push_order_by(&self, sql: &mut String, bind_params: &mut Vec<BindValue>) {
        let mut keys = Vec::with_capacity(self.sort.len() + 1);
        for sort in &self.sort {
            let expr = match &sort.key {
                ResolvedSortKey::Column(column) => format!("c.{}", column),
                ResolvedSortKey::Field {
                    field_definition_ids,
                    column,
                } => {
                    let ids: Vec<String> = field_definition_ids
                        .iter()
                        .map(|id| format!("${}", push_int(bind_params, *id)))
                        .collect();
                    format!(
                        "(SELECT MIN(sf.{}) FROM content_field sf WHERE sf.content_id = c.id \
                         AND sf.version = c.current_version AND sf.field_definition_id IN ({}))",
                        column.column_name(),
                        ids.join(", ")
                    )
                }
            };
            keys.push(format!("{} {}", expr, sort.direction.as_sql()));
        }

        let id_is_sorted = self
            .sort
            .iter()
            .any(|s| s.key == ResolvedSortKey::Column("id"));
        if !id_is_sorted {
            keys.push("c.id ASC".to_string());
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(&keys.join(", "));
    }
}
