//! Folds raw content rows into content summaries.

use crate::criterion::ContentStatus;
use crate::models::{ContentRow, ContentSummary, FieldValue, LocationSummary};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Rows for one content item may be spread over several rows (one per
/// location/field combination). Output order follows first appearance of
/// each content id, so the page order from the store is preserved.
#[derive(Debug, Default)]
pub struct Mapper;

impl Mapper {
    pub fn map(rows: Vec<ContentRow>) -> Result<Vec<ContentSummary>> {
        let mut content: Vec<ContentSummary> = Vec::new();
        let mut positions: HashMap<i64, usize> = HashMap::new();
        let mut seen_locations: HashSet<(i64, i64)> = HashSet::new();
        let mut seen_fields: HashSet<(i64, i64)> = HashSet::new();

        for row in rows {
            let position = match positions.get(&row.id) {
                Some(position) => *position,
                None => {
                    positions.insert(row.id, content.len());
                    content.push(summary(&row)?);
                    content.len() - 1
                }
            };
            let item = &mut content[position];

            if let Some(location) = location(&row) {
                if seen_locations.insert((row.id, location.id)) {
                    item.locations.push(location);
                }
            }
            if let Some(field) = field(&row) {
                if seen_fields.insert((row.id, field.id)) {
                    item.fields.push(field);
                }
            }
        }

        Ok(content)
    }
}

fn summary(row: &ContentRow) -> Result<ContentSummary> {
    let status = ContentStatus::from_code(row.status).ok_or_else(|| {
        Error::Mapping(format!(
            "content {} has unknown status code {}",
            row.id, row.status
        ))
    })?;

    Ok(ContentSummary {
        id: row.id,
        content_type_id: row.content_type_id,
        section_id: row.section_id,
        status,
        remote_id: row.remote_id.clone(),
        name: row.name.clone(),
        current_version: row.current_version,
        created: timestamp(row.id, row.created)?,
        modified: timestamp(row.id, row.modified)?,
        locations: Vec::new(),
        fields: Vec::new(),
    })
}

fn timestamp(content_id: i64, seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        Error::Mapping(format!(
            "content {} has out of range timestamp {}",
            content_id, seconds
        ))
    })
}

fn location(row: &ContentRow) -> Option<LocationSummary> {
    Some(LocationSummary {
        id: row.location_id?,
        parent_id: row.location_parent_id?,
        path_string: row.location_path_string.clone()?,
        depth: row.location_depth?,
    })
}

fn field(row: &ContentRow) -> Option<FieldValue> {
    Some(FieldValue {
        id: row.field_id?,
        field_definition_id: row.field_definition_id?,
        data_type: row.field_data_type.clone()?,
        language_code: row.field_language_code.clone()?,
        sort_key_string: row.field_sort_key_string.clone(),
        sort_key_int: row.field_sort_key_int,
    })
}
