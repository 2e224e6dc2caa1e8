#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

use anyhow::Context as _;
use ferrum_search::config::{DatabaseConfig, FullTextSearchConfig};
use ferrum_search::{ConverterRegistry, FullTextAnalyzer, SearchHandler, SqlGateway};
use std::sync::Arc;
use tempfile::TempDir;

pub use assertions::*;
pub use fixtures::*;

/// Temporary SQLite content store seeded with the fixture corpus.
pub struct TestStore {
    pub gateway: Arc<SqlGateway>,
    // Keeps the database file alive for the lifetime of the store
    _dir: TempDir,
}

impl TestStore {
    pub async fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let path = dir.path().join("content.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections: 1,
            ..DatabaseConfig::default()
        };

        let gateway = SqlGateway::connect(&config)
            .await
            .context("connect sqlite store")?;
        gateway.install_schema().await.context("install schema")?;
        fixtures::seed(&gateway).await.context("seed fixture corpus")?;

        Ok(Self {
            gateway: Arc::new(gateway),
            _dir: dir,
        })
    }

    pub fn handler(&self) -> anyhow::Result<SearchHandler> {
        self.handler_with(FullTextSearchConfig::default())
    }

    pub fn handler_with(&self, full_text: FullTextSearchConfig) -> anyhow::Result<SearchHandler> {
        let analyzer = FullTextAnalyzer::from_config(full_text)?;
        let handler = SearchHandler::new(
            self.gateway.clone(),
            Arc::new(analyzer),
            Arc::new(ConverterRegistry::with_defaults()),
        )?;
        Ok(handler)
    }
}
