//! Result and persistence-facing types.

use crate::criterion::{ContentStatus, FieldTarget};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result envelope returned by `find`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: Vec<ContentSummary>,
    /// Total distinct matches, independent of the paging window.
    pub count: i64,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.content.iter().map(|c| c.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub id: i64,
    pub content_type_id: i64,
    pub section_id: i64,
    pub status: ContentStatus,
    pub remote_id: String,
    pub name: String,
    pub current_version: i64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub locations: Vec<LocationSummary>,
    pub fields: Vec<FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub id: i64,
    pub parent_id: i64,
    pub path_string: String,
    pub depth: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub id: i64,
    pub field_definition_id: i64,
    pub data_type: String,
    pub language_code: String,
    pub sort_key_string: Option<String>,
    pub sort_key_int: Option<i64>,
}

/// Field definition as stored for a content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: i64,
    pub content_type_id: i64,
    pub identifier: String,
    pub data_type: String,
}

/// One raw row of the content load query. A content item with several
/// locations and fields comes back as several rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    pub id: i64,
    pub content_type_id: i64,
    pub section_id: i64,
    pub status: i64,
    pub remote_id: String,
    pub name: String,
    pub current_version: i64,
    pub created: i64,
    pub modified: i64,
    pub location_id: Option<i64>,
    pub location_parent_id: Option<i64>,
    pub location_path_string: Option<String>,
    pub location_depth: Option<i64>,
    pub field_id: Option<i64>,
    pub field_definition_id: Option<i64>,
    pub field_data_type: Option<String>,
    pub field_language_code: Option<String>,
    pub field_sort_key_string: Option<String>,
    pub field_sort_key_int: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortTarget {
    ContentId,
    ContentName,
    DateCreated,
    DateModified,
    SectionId,
    ContentTypeId,
    Field(FieldTarget),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortClause {
    pub target: SortTarget,
    pub direction: SortDirection,
}

impl SortClause {
    pub fn asc(target: SortTarget) -> Self {
        Self {
            target,
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(target: SortTarget) -> Self {
        Self {
            target,
            direction: SortDirection::Descending,
        }
    }
}

impl fmt::Display for SortClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match &self.target {
            SortTarget::ContentId => "content_id".to_string(),
            SortTarget::ContentName => "content_name".to_string(),
            SortTarget::DateCreated => "date_created".to_string(),
            SortTarget::DateModified => "date_modified".to_string(),
            SortTarget::SectionId => "section_id".to_string(),
            SortTarget::ContentTypeId => "content_type_id".to_string(),
            SortTarget::Field(t) => format!("field/{}", t),
        };
        let direction = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{}:{}", target, direction)
    }
}

/// Parses `target[:asc|desc]`, e.g. `date_modified:desc` or
/// `field/product/price:asc`.
impl FromStr for SortClause {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let (target, direction) = match s.rsplit_once(':') {
            Some((t, "asc")) => (t, SortDirection::Ascending),
            Some((t, "desc")) => (t, SortDirection::Descending),
            Some((_, other)) => {
                return Err(crate::Error::InvalidCriterionValue(format!(
                    "unknown sort direction '{}'",
                    other
                )))
            }
            None => (s, SortDirection::Ascending),
        };

        let target = match target {
            "content_id" => SortTarget::ContentId,
            "content_name" => SortTarget::ContentName,
            "date_created" => SortTarget::DateCreated,
            "date_modified" => SortTarget::DateModified,
            "section_id" => SortTarget::SectionId,
            "content_type_id" => SortTarget::ContentTypeId,
            other => match other.strip_prefix("field/").and_then(|r| r.split_once('/')) {
                Some((content_type, field)) if !content_type.is_empty() && !field.is_empty() => {
                    SortTarget::Field(FieldTarget::new(content_type, field))
                }
                _ => {
                    return Err(crate::Error::InvalidCriterionValue(format!(
                        "unknown sort target '{}'",
                        other
                    )))
                }
            },
        };

        Ok(Self { target, direction })
    }
}
