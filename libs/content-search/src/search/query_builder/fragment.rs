//! Structured boolean predicates produced by criterion handlers.

use crate::criterion::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// Predicate over one column of the relation currently in scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Compare {
        column: &'static str,
        op: Comparison,
        value: Value,
    },
    /// Empty list matches nothing.
    In {
        column: &'static str,
        values: Vec<Value>,
    },
    /// Inclusive on both ends.
    Between {
        column: &'static str,
        low: Value,
        high: Value,
    },
    /// `pattern` is a ready SQL pattern escaped with `\`.
    Like {
        column: &'static str,
        pattern: String,
    },
    /// `column` of the joined relation equals `parent_column` of the relation
    /// the join hangs off.
    Correlated {
        column: &'static str,
        parent_column: &'static str,
    },
}

/// A related table reached from the enclosing relation. Two joins are the
/// same join only if table, correlation and discriminators all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Join {
    pub table: &'static str,
    pub column: &'static str,
    pub parent_column: &'static str,
    pub discriminators: Vec<Condition>,
}

impl Join {
    pub fn new(table: &'static str, column: &'static str, parent_column: &'static str) -> Self {
        Self {
            table,
            column,
            parent_column,
            discriminators: Vec::new(),
        }
    }

    pub fn discriminated_by(mut self, condition: Condition) -> Self {
        self.discriminators.push(condition);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinedFilter {
    pub join: Join,
    pub filter: QueryFragment,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryFragment {
    MatchAll,
    MatchNone,
    Condition(Condition),
    Join(Box<JoinedFilter>),
    And(Vec<QueryFragment>),
    Or(Vec<QueryFragment>),
    Not(Box<QueryFragment>),
}

impl From<Condition> for QueryFragment {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl QueryFragment {
    pub fn join(join: Join, filter: impl Into<QueryFragment>) -> Self {
        Self::Join(Box::new(JoinedFilter {
            join,
            filter: filter.into(),
        }))
    }

    /// Conjunction. Nested ANDs are flattened, identical siblings emitted
    /// once, `MatchAll` dropped and any `MatchNone` collapses the result.
    pub fn and(children: Vec<QueryFragment>) -> Self {
        let mut out: Vec<QueryFragment> = Vec::new();
        for child in flatten(children, |f| matches!(f, Self::And(_))) {
            match child {
                Self::MatchAll => {}
                Self::MatchNone => return Self::MatchNone,
                other => {
                    if !out.contains(&other) {
                        out.push(other);
                    }
                }
            }
        }
        collapse(out, Self::MatchAll, Self::And)
    }

    /// Disjunction. Nested ORs are flattened, `MatchNone` dropped and any
    /// `MatchAll` wins. Sibling joins with the same key are fused into one
    /// join over the disjunction of their filters.
    pub fn or(children: Vec<QueryFragment>) -> Self {
        let mut out: Vec<QueryFragment> = Vec::new();
        for child in flatten(children, |f| matches!(f, Self::Or(_))) {
            match child {
                Self::MatchNone => {}
                Self::MatchAll => return Self::MatchAll,
                Self::Join(joined) => {
                    let position = out
                        .iter()
                        .position(|f| matches!(f, Self::Join(j) if j.join == joined.join));
                    match position {
                        Some(idx) => {
                            if let Self::Join(existing) = &mut out[idx] {
                                let left = std::mem::replace(&mut existing.filter, Self::MatchNone);
                                existing.filter = Self::or(vec![left, joined.filter]);
                            }
                        }
                        None => out.push(Self::Join(joined)),
                    }
                }
                other => {
                    if !out.contains(&other) {
                        out.push(other);
                    }
                }
            }
        }
        collapse(out, Self::MatchNone, Self::Or)
    }

    /// Negation of the conjunction of `children`.
    pub fn not(children: Vec<QueryFragment>) -> Self {
        match Self::and(children) {
            Self::MatchAll => Self::MatchNone,
            Self::MatchNone => Self::MatchAll,
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    pub fn is_match_none(&self) -> bool {
        matches!(self, Self::MatchNone)
    }

    /// Number of join instances the fragment renders, nested ones included.
    pub fn join_count(&self) -> usize {
        match self {
            Self::MatchAll | Self::MatchNone | Self::Condition(_) => 0,
            Self::Join(j) => 1 + j.filter.join_count(),
            Self::And(children) | Self::Or(children) => children.iter().map(Self::join_count).sum(),
            Self::Not(inner) => inner.join_count(),
        }
    }
}

fn flatten(children: Vec<QueryFragment>, same: impl Fn(&QueryFragment) -> bool + Copy) -> Vec<QueryFragment> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        if same(&child) {
            if let QueryFragment::And(inner) | QueryFragment::Or(inner) = child {
                out.extend(flatten(inner, same));
            }
        } else {
            out.push(child);
        }
    }
    out
}

fn collapse(
    mut children: Vec<QueryFragment>,
    empty: QueryFragment,
    wrap: fn(Vec<QueryFragment>) -> QueryFragment,
) -> QueryFragment {
    match children.len() {
        0 => empty,
        1 => children.remove(0),
        _ => wrap(children),
    }
}
