//! Criterion model.
//!
//! A [`Criterion`] is an immutable node of a filter expression tree: a leaf
//! comparison over one target (content id, location, field value, ...), a
//! full-text phrase, or a logical combinator over child criteria.
//!
//! Leaves are only constructed through validating constructors, so an
//! operand whose shape does not fit its operator (e.g. `BETWEEN` with one
//! value) is rejected before it can reach the converter.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar operand value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Text(v) => Some(v.as_str()),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "'{}'", v),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Int(v.timestamp())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    Like,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "EQ",
            Self::In => "IN",
            Self::Gt => "GT",
            Self::Gte => "GTE",
            Self::Lt => "LT",
            Self::Lte => "LTE",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
        };
        f.write_str(s)
    }
}

/// Operand shape. Constructors normalize it per operator: `EQ` and the
/// ordering operators hold `Single`, `IN` holds `List`, `BETWEEN` holds
/// `Range`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Single(Value),
    List(Vec<Value>),
    Range(Value, Value),
}

impl Operand {
    pub fn values(&self) -> Vec<&Value> {
        match self {
            Self::Single(v) => vec![v],
            Self::List(vs) => vs.iter().collect(),
            Self::Range(a, b) => vec![a, b],
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Self::Single(v)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(vs: Vec<Value>) -> Self {
        Self::List(vs)
    }
}

/// Content status codes stored in the content table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn code(self) -> i64 {
        match self {
            Self::Draft => 0,
            Self::Published => 1,
            Self::Archived => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Draft),
            1 => Some(Self::Published),
            2 => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateTarget {
    Created,
    Modified,
}

/// Field addressed by content type identifier and field identifier,
/// e.g. `("product", "price")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldTarget {
    pub content_type: String,
    pub field: String,
}

impl FieldTarget {
    pub fn new(content_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for FieldTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.content_type, self.field)
    }
}

/// What a leaf criterion compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    ContentId,
    LocationId,
    ParentLocationId,
    SubtreeId,
    ContentTypeId,
    ContentTypeGroupId,
    RemoteId,
    SectionId,
    Status,
    DateMetadata(DateTarget),
    Field(FieldTarget),
}

impl Target {
    pub fn kind(&self) -> CriterionKind {
        match self {
            Self::ContentId => CriterionKind::ContentId,
            Self::LocationId => CriterionKind::LocationId,
            Self::ParentLocationId => CriterionKind::ParentLocationId,
            Self::SubtreeId => CriterionKind::SubtreeId,
            Self::ContentTypeId => CriterionKind::ContentTypeId,
            Self::ContentTypeGroupId => CriterionKind::ContentTypeGroupId,
            Self::RemoteId => CriterionKind::RemoteId,
            Self::SectionId => CriterionKind::SectionId,
            Self::Status => CriterionKind::Status,
            Self::DateMetadata(_) => CriterionKind::DateMetadata,
            Self::Field(_) => CriterionKind::Field,
        }
    }

    fn supports(&self, operator: Operator) -> bool {
        use Operator::*;
        match self {
            Self::DateMetadata(_) => matches!(operator, Eq | In | Gt | Gte | Lt | Lte | Between),
            Self::Field(_) => true,
            _ => matches!(operator, Eq | In),
        }
    }

    fn check_value(&self, value: &Value) -> Result<()> {
        let expect_int = |v: &Value| {
            if v.as_int().is_some() {
                Ok(())
            } else {
                Err(Error::InvalidCriterionValue(format!(
                    "{} expects integer values, got {}",
                    self,
                    v.type_name()
                )))
            }
        };
        match self {
            Self::RemoteId => match value {
                Value::Text(_) => Ok(()),
                Value::Int(_) => Err(Error::InvalidCriterionValue(
                    "RemoteId expects text values".to_string(),
                )),
            },
            Self::SubtreeId => match value {
                Value::Text(path) if is_valid_path_string(path) => Ok(()),
                other => Err(Error::InvalidCriterionValue(format!(
                    "SubtreeId expects a location path like '/1/2/', got {}",
                    other
                ))),
            },
            Self::Status => {
                expect_int(value)?;
                match value.as_int().and_then(ContentStatus::from_code) {
                    Some(_) => Ok(()),
                    None => Err(Error::InvalidCriterionValue(format!(
                        "unknown content status {}",
                        value
                    ))),
                }
            }
            Self::Field(_) => Ok(()),
            _ => expect_int(value),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateMetadata(DateTarget::Created) => f.write_str("DateMetadata(created)"),
            Self::DateMetadata(DateTarget::Modified) => f.write_str("DateMetadata(modified)"),
            Self::Field(t) => write!(f, "Field({})", t),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

/// Materialized location path: `/` followed by one or more `<digits>/`.
fn is_valid_path_string(path: &str) -> bool {
    let Some(inner) = path.strip_prefix('/').and_then(|p| p.strip_suffix('/')) else {
        return false;
    };
    !inner.is_empty()
        && inner
            .split('/')
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()))
}

/// Dispatch key used by the handler registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionKind {
    ContentId,
    LocationId,
    ParentLocationId,
    SubtreeId,
    ContentTypeId,
    ContentTypeGroupId,
    RemoteId,
    SectionId,
    Status,
    DateMetadata,
    Field,
    FullText,
    LogicalAnd,
    LogicalOr,
    LogicalNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafCriterion {
    target: Target,
    operator: Operator,
    operand: Operand,
}

impl LeafCriterion {
    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullTextCriterion {
    phrase: String,
}

impl FullTextCriterion {
    pub fn phrase(&self) -> &str {
        &self.phrase
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalCriterion {
    operator: LogicalOperator,
    children: Vec<Criterion>,
}

impl LogicalCriterion {
    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    pub fn children(&self) -> &[Criterion] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CriterionRepr", into = "CriterionRepr")]
pub enum Criterion {
    Leaf(LeafCriterion),
    FullText(FullTextCriterion),
    Logical(LogicalCriterion),
}

impl Criterion {
    /// Build a leaf criterion, validating operator support, operand arity and
    /// value types.
    pub fn leaf(target: Target, operator: Operator, operand: impl Into<Operand>) -> Result<Self> {
        if !target.supports(operator) {
            return Err(Error::unsupported(&target, operator));
        }

        let operand = normalize_operand(&target, operator, operand.into())?;
        for value in operand.values() {
            target.check_value(value)?;
        }
        if let Target::Field(_) = &target {
            check_field_operand(&target, operator, &operand)?;
        }

        Ok(Self::Leaf(LeafCriterion {
            target,
            operator,
            operand,
        }))
    }

    fn id_list(target: Target, ids: impl IntoIterator<Item = i64>) -> Self {
        Self::Leaf(LeafCriterion {
            target,
            operator: Operator::In,
            operand: Operand::List(ids.into_iter().map(Value::Int).collect()),
        })
    }

    pub fn content_id(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::id_list(Target::ContentId, ids)
    }

    pub fn location_id(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::id_list(Target::LocationId, ids)
    }

    pub fn parent_location_id(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::id_list(Target::ParentLocationId, ids)
    }

    pub fn content_type_id(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::id_list(Target::ContentTypeId, ids)
    }

    pub fn content_type_group_id(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::id_list(Target::ContentTypeGroupId, ids)
    }

    pub fn section_id(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::id_list(Target::SectionId, ids)
    }

    pub fn status(statuses: impl IntoIterator<Item = ContentStatus>) -> Self {
        Self::id_list(Target::Status, statuses.into_iter().map(ContentStatus::code))
    }

    pub fn remote_id<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::Leaf(LeafCriterion {
            target: Target::RemoteId,
            operator: Operator::In,
            operand: Operand::List(ids.into_iter().map(|s| Value::Text(s.into())).collect()),
        })
    }

    /// Subtree criterion over one or more materialized path prefixes.
    pub fn subtree<S: Into<String>>(paths: impl IntoIterator<Item = S>) -> Result<Self> {
        let values: Vec<Value> = paths.into_iter().map(|p| Value::Text(p.into())).collect();
        Self::leaf(Target::SubtreeId, Operator::In, values)
    }

    pub fn date_metadata(
        target: DateTarget,
        operator: Operator,
        operand: impl Into<Operand>,
    ) -> Result<Self> {
        Self::leaf(Target::DateMetadata(target), operator, operand)
    }

    pub fn field(
        content_type: impl Into<String>,
        field: impl Into<String>,
        operator: Operator,
        operand: impl Into<Operand>,
    ) -> Result<Self> {
        Self::leaf(
            Target::Field(FieldTarget::new(content_type, field)),
            operator,
            operand,
        )
    }

    pub fn full_text(phrase: impl Into<String>) -> Self {
        Self::FullText(FullTextCriterion {
            phrase: phrase.into(),
        })
    }

    pub fn logical(operator: LogicalOperator, children: Vec<Criterion>) -> Result<Self> {
        if children.is_empty() {
            return Err(Error::arity(
                format!("Logical{:?}", operator),
                "",
                "expects at least one child criterion",
            ));
        }
        Ok(Self::Logical(LogicalCriterion { operator, children }))
    }

    pub fn and(children: Vec<Criterion>) -> Result<Self> {
        Self::logical(LogicalOperator::And, children)
    }

    pub fn or(children: Vec<Criterion>) -> Result<Self> {
        Self::logical(LogicalOperator::Or, children)
    }

    pub fn not(child: Criterion) -> Self {
        Self::Logical(LogicalCriterion {
            operator: LogicalOperator::Not,
            children: vec![child],
        })
    }

    pub fn kind(&self) -> CriterionKind {
        match self {
            Self::Leaf(leaf) => leaf.target.kind(),
            Self::FullText(_) => CriterionKind::FullText,
            Self::Logical(l) => match l.operator {
                LogicalOperator::And => CriterionKind::LogicalAnd,
                LogicalOperator::Or => CriterionKind::LogicalOr,
                LogicalOperator::Not => CriterionKind::LogicalNot,
            },
        }
    }

    /// Children of a combinator; empty for leaves.
    pub fn children(&self) -> &[Criterion] {
        match self {
            Self::Logical(l) => &l.children,
            _ => &[],
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafCriterion> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_full_text(&self) -> Option<&FullTextCriterion> {
        match self {
            Self::FullText(ft) => Some(ft),
            _ => None,
        }
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Criterion)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => write!(f, "{} {}", leaf.target, leaf.operator),
            Self::FullText(ft) => write!(f, "FullText('{}')", ft.phrase),
            Self::Logical(l) => write!(f, "Logical{:?}[{}]", l.operator, l.children.len()),
        }
    }
}

fn normalize_operand(target: &Target, operator: Operator, operand: Operand) -> Result<Operand> {
    match operator {
        Operator::In => match operand {
            Operand::Single(v) => Ok(Operand::List(vec![v])),
            Operand::List(vs) => Ok(Operand::List(vs)),
            Operand::Range(..) => Err(Error::arity(target, operator, "expects a list of values")),
        },
        Operator::Between => match operand {
            Operand::Range(a, b) => Ok(Operand::Range(a, b)),
            Operand::List(vs) => match <[Value; 2]>::try_from(vs) {
                Ok([low, high]) => Ok(Operand::Range(low, high)),
                Err(vs) => Err(Error::arity(
                    target,
                    operator,
                    format!("expects exactly 2 values, got {}", vs.len()),
                )),
            },
            Operand::Single(_) => Err(Error::arity(
                target,
                operator,
                "expects exactly 2 values, got 1",
            )),
        },
        Operator::Eq | Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte | Operator::Like => {
            match operand {
                Operand::Single(v) => Ok(Operand::Single(v)),
                Operand::List(mut vs) if vs.len() == 1 => Ok(Operand::Single(vs.remove(0))),
                Operand::List(vs) => Err(Error::arity(
                    target,
                    operator,
                    format!("expects a single value, got {}", vs.len()),
                )),
                Operand::Range(..) => {
                    Err(Error::arity(target, operator, "expects a single value, got 2"))
                }
            }
        }
    }
}

fn check_field_operand(target: &Target, operator: Operator, operand: &Operand) -> Result<()> {
    let values = operand.values();
    if operator == Operator::Like && values.iter().any(|v| v.as_text().is_none()) {
        return Err(Error::InvalidCriterionValue(format!(
            "{} LIKE expects a text pattern",
            target
        )));
    }
    if let Some(first) = values.first() {
        if values.iter().any(|v| v.type_name() != first.type_name()) {
            return Err(Error::InvalidCriterionValue(format!(
                "{} mixes integer and text values",
                target
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Serialized form: externally tagged, e.g.
// {"and": [{"content_id": {"in": [1, 4]}}, {"full_text": "applied"}]}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ComparisonRepr {
    Eq(Value),
    In(Vec<Value>),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Between(Vec<Value>),
    Like(Value),
}

impl ComparisonRepr {
    fn into_parts(self) -> (Operator, Operand) {
        match self {
            Self::Eq(v) => (Operator::Eq, Operand::Single(v)),
            Self::In(vs) => (Operator::In, Operand::List(vs)),
            Self::Gt(v) => (Operator::Gt, Operand::Single(v)),
            Self::Gte(v) => (Operator::Gte, Operand::Single(v)),
            Self::Lt(v) => (Operator::Lt, Operand::Single(v)),
            Self::Lte(v) => (Operator::Lte, Operand::Single(v)),
            Self::Between(vs) => (Operator::Between, Operand::List(vs)),
            Self::Like(v) => (Operator::Like, Operand::Single(v)),
        }
    }

    fn from_parts(operator: Operator, operand: Operand) -> Self {
        let single = |operand: Operand| match operand {
            Operand::Single(v) => v,
            Operand::List(mut vs) => vs.remove(0),
            Operand::Range(a, _) => a,
        };
        match operator {
            Operator::Eq => Self::Eq(single(operand)),
            Operator::Gt => Self::Gt(single(operand)),
            Operator::Gte => Self::Gte(single(operand)),
            Operator::Lt => Self::Lt(single(operand)),
            Operator::Lte => Self::Lte(single(operand)),
            Operator::Like => Self::Like(single(operand)),
            Operator::In => Self::In(match operand {
                Operand::Single(v) => vec![v],
                Operand::List(vs) => vs,
                Operand::Range(a, b) => vec![a, b],
            }),
            Operator::Between => Self::Between(match operand {
                Operand::Range(a, b) => vec![a, b],
                Operand::List(vs) => vs,
                Operand::Single(v) => vec![v],
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CriterionRepr {
    ContentId(ComparisonRepr),
    LocationId(ComparisonRepr),
    ParentLocationId(ComparisonRepr),
    SubtreeId(ComparisonRepr),
    ContentTypeId(ComparisonRepr),
    ContentTypeGroupId(ComparisonRepr),
    RemoteId(ComparisonRepr),
    SectionId(ComparisonRepr),
    Status(ComparisonRepr),
    DateMetadata {
        target: DateTarget,
        #[serde(flatten)]
        comparison: ComparisonRepr,
    },
    Field {
        content_type: String,
        field: String,
        #[serde(flatten)]
        comparison: ComparisonRepr,
    },
    FullText(String),
    And(Vec<CriterionRepr>),
    Or(Vec<CriterionRepr>),
    Not(Vec<CriterionRepr>),
}

impl TryFrom<CriterionRepr> for Criterion {
    type Error = Error;

    fn try_from(repr: CriterionRepr) -> Result<Self> {
        let leaf = |target: Target, comparison: ComparisonRepr| {
            let (operator, operand) = comparison.into_parts();
            Criterion::leaf(target, operator, operand)
        };
        let children = |reprs: Vec<CriterionRepr>| -> Result<Vec<Criterion>> {
            reprs.into_iter().map(Criterion::try_from).collect()
        };

        match repr {
            CriterionRepr::ContentId(c) => leaf(Target::ContentId, c),
            CriterionRepr::LocationId(c) => leaf(Target::LocationId, c),
            CriterionRepr::ParentLocationId(c) => leaf(Target::ParentLocationId, c),
            CriterionRepr::SubtreeId(c) => leaf(Target::SubtreeId, c),
            CriterionRepr::ContentTypeId(c) => leaf(Target::ContentTypeId, c),
            CriterionRepr::ContentTypeGroupId(c) => leaf(Target::ContentTypeGroupId, c),
            CriterionRepr::RemoteId(c) => leaf(Target::RemoteId, c),
            CriterionRepr::SectionId(c) => leaf(Target::SectionId, c),
            CriterionRepr::Status(c) => leaf(Target::Status, c),
            CriterionRepr::DateMetadata { target, comparison } => {
                leaf(Target::DateMetadata(target), comparison)
            }
            CriterionRepr::Field {
                content_type,
                field,
                comparison,
            } => leaf(
                Target::Field(FieldTarget::new(content_type, field)),
                comparison,
            ),
            CriterionRepr::FullText(phrase) => Ok(Criterion::full_text(phrase)),
            CriterionRepr::And(c) => Criterion::and(children(c)?),
            CriterionRepr::Or(c) => Criterion::or(children(c)?),
            CriterionRepr::Not(c) => Criterion::logical(LogicalOperator::Not, children(c)?),
        }
    }
}

impl From<Criterion> for CriterionRepr {
    fn from(criterion: Criterion) -> Self {
        match criterion {
            Criterion::Leaf(LeafCriterion {
                target,
                operator,
                operand,
            }) => {
                let comparison = ComparisonRepr::from_parts(operator, operand);
                match target {
                    Target::ContentId => Self::ContentId(comparison),
                    Target::LocationId => Self::LocationId(comparison),
                    Target::ParentLocationId => Self::ParentLocationId(comparison),
                    Target::SubtreeId => Self::SubtreeId(comparison),
                    Target::ContentTypeId => Self::ContentTypeId(comparison),
                    Target::ContentTypeGroupId => Self::ContentTypeGroupId(comparison),
                    Target::RemoteId => Self::RemoteId(comparison),
                    Target::SectionId => Self::SectionId(comparison),
                    Target::Status => Self::Status(comparison),
                    Target::DateMetadata(target) => Self::DateMetadata { target, comparison },
                    Target::Field(FieldTarget {
                        content_type,
                        field,
                    }) => Self::Field {
                        content_type,
                        field,
                        comparison,
                    },
                }
            }
            Criterion::FullText(ft) => Self::FullText(ft.phrase),
            Criterion::Logical(l) => {
                let children = l.children.into_iter().map(Self::from).collect();
                match l.operator {
                    LogicalOperator::And => Self::And(children),
                    LogicalOperator::Or => Self::Or(children),
                    LogicalOperator::Not => Self::Not(children),
                }
            }
        }
    }
}
