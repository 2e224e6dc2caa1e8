//! SQL gateway over the sqlx `Any` driver (PostgreSQL or SQLite).
//!
//! Statements use `$n` placeholders, which both backends accept.

use super::SearchGateway;
use crate::config::DatabaseConfig;
use crate::criterion::FieldTarget;
use crate::models::{ContentRow, FieldDefinition};
use crate::search::query_builder::{BindValue, SqlStatement};
use crate::Result;
use async_trait::async_trait;
use sqlx::any::{AnyArguments, AnyPoolOptions, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Row};
use std::collections::HashMap;
use std::sync::Once;

const SCHEMA: &str = include_str!("../../schema/content.sql");

// SQLx `Any` driver requires runtime installation
static INSTALL_DRIVERS: Once = Once::new();

fn install_drivers() {
    INSTALL_DRIVERS.call_once(|| {
        sqlx::any::install_default_drivers();
    });
}

#[derive(Debug, Clone)]
pub struct SqlGateway {
    pool: AnyPool,
}

impl SqlGateway {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        install_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await?;
        tracing::info!(url = %redact_url(&config.url), "Connected content store");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Create the tables and indexes the engine reads, if missing.
    pub async fn install_schema(&self) -> Result<()> {
        for statement in schema_statements(SCHEMA) {
            sqlx::query(&statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Comments run to end of line and are removed before splitting on `;`.
fn schema_statements(schema: &str) -> Vec<String> {
    let uncommented = schema
        .lines()
        .map(|line| match line.find("--") {
            Some(start) => &line[..start],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n");
    uncommented
        .split(';')
        .map(|stmt| stmt.trim().to_string())
        .filter(|stmt| !stmt.is_empty())
        .collect()
}

fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

fn prepare(statement: &SqlStatement) -> Query<'_, Any, AnyArguments<'_>> {
    let mut query = sqlx::query(&statement.sql);
    for value in &statement.binds {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.clone()),
        };
    }
    query
}

fn content_row(row: &AnyRow) -> std::result::Result<ContentRow, sqlx::Error> {
    Ok(ContentRow {
        id: row.try_get("id")?,
        content_type_id: row.try_get("content_type_id")?,
        section_id: row.try_get("section_id")?,
        status: row.try_get("status")?,
        remote_id: row.try_get("remote_id")?,
        name: row.try_get("name")?,
        current_version: row.try_get("current_version")?,
        created: row.try_get("created")?,
        modified: row.try_get("modified")?,
        location_id: row.try_get("location_id")?,
        location_parent_id: row.try_get("location_parent_id")?,
        location_path_string: row.try_get("location_path_string")?,
        location_depth: row.try_get("location_depth")?,
        field_id: row.try_get("field_id")?,
        field_definition_id: row.try_get("field_definition_id")?,
        field_data_type: row.try_get("field_data_type")?,
        field_language_code: row.try_get("field_language_code")?,
        field_sort_key_string: row.try_get("field_sort_key_string")?,
        field_sort_key_int: row.try_get("field_sort_key_int")?,
    })
}

#[async_trait]
impl SearchGateway for SqlGateway {
    async fn count(&self, statement: &SqlStatement) -> Result<i64> {
        tracing::debug!(sql = %statement.sql, binds = statement.binds.len(), "Executing count query");
        let row = prepare(statement).fetch_one(&self.pool).await?;
        Ok(row.try_get(0)?)
    }

    async fn fetch_ids(&self, statement: &SqlStatement) -> Result<Vec<i64>> {
        tracing::debug!(sql = %statement.sql, binds = statement.binds.len(), "Executing page query");
        let rows = prepare(statement).fetch_all(&self.pool).await?;
        let ids = rows
            .iter()
            .map(|row| row.try_get::<i64, _>(0))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    async fn fetch_rows(&self, statement: &SqlStatement) -> Result<Vec<ContentRow>> {
        tracing::debug!(sql = %statement.sql, binds = statement.binds.len(), "Executing content load");
        let rows = prepare(statement).fetch_all(&self.pool).await?;
        let rows = rows
            .iter()
            .map(content_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn field_definitions(&self, target: &FieldTarget) -> Result<Vec<FieldDefinition>> {
        let rows = sqlx::query(
            "SELECT fd.id, fd.content_type_id, fd.identifier, fd.data_type \
             FROM field_definition fd \
             JOIN content_type ct ON ct.id = fd.content_type_id \
             WHERE ct.identifier = $1 AND fd.identifier = $2 \
             ORDER BY fd.id",
        )
        .bind(target.content_type.clone())
        .bind(target.field.clone())
        .fetch_all(&self.pool)
        .await?;

        let mut definitions = Vec::with_capacity(rows.len());
        for row in rows {
            definitions.push(FieldDefinition {
                id: row.try_get("id")?,
                content_type_id: row.try_get("content_type_id")?,
                identifier: row.try_get("identifier")?,
                data_type: row.try_get("data_type")?,
            });
        }
        tracing::debug!(field = %target, definitions = definitions.len(), "Resolved field definitions");
        Ok(definitions)
    }

    async fn word_frequencies(&self, words: &[String]) -> Result<HashMap<String, u64>> {
        if words.is_empty() {
            return Ok(HashMap::new());
        }

        let binds: Vec<BindValue> = words.iter().cloned().map(BindValue::Text).collect();
        let placeholders: Vec<String> = (1..=binds.len()).map(|i| format!("${}", i)).collect();
        let statement = SqlStatement {
            sql: format!(
                "SELECT word, object_count FROM search_word WHERE word IN ({})",
                placeholders.join(", ")
            ),
            binds,
        };

        let rows = prepare(&statement).fetch_all(&self.pool).await?;
        let mut frequencies = HashMap::with_capacity(rows.len());
        for row in rows {
            let word: String = row.try_get("word")?;
            let count: i64 = row.try_get("object_count")?;
            frequencies.insert(word, u64::try_from(count).unwrap_or(0));
        }
        Ok(frequencies)
    }
}
