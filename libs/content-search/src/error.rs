//! Error types for content search

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid arity for {target} {operator}: {reason}")]
    InvalidCriterionArity {
        target: String,
        operator: String,
        reason: String,
    },

    #[error("Operator {operator} is not supported for {target}")]
    UnsupportedOperator { target: String, operator: String },

    #[error("Invalid criterion value: {0}")]
    InvalidCriterionValue(String),

    #[error("No criterion handler found for {0}")]
    NoHandlerFound(String),

    #[error("Ambiguous criterion handler for {criterion}: {candidates} handlers accept it")]
    AmbiguousHandler { criterion: String, candidates: usize },

    #[error("Conflicting criterion handlers: {0}")]
    ConflictingHandlers(String),

    #[error("No field value converter registered for field type '{0}'")]
    UnresolvedFieldType(String),

    #[error("Field not found: {content_type}/{field}")]
    FieldNotFound { content_type: String, field: String },

    #[error("Expected exactly one result, found {count}")]
    InvalidResultCount { count: i64 },

    #[error("Invalid transformation rule in {source_name} at line {line}: {message}")]
    RuleSyntax {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("Unknown transformation command '{0}'")]
    UnknownTransformation(String),

    #[error("Cannot map stored row: {0}")]
    Mapping(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    pub(crate) fn arity(
        target: impl std::fmt::Display,
        operator: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidCriterionArity {
            target: target.to_string(),
            operator: operator.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(
        target: impl std::fmt::Display,
        operator: impl std::fmt::Display,
    ) -> Self {
        Self::UnsupportedOperator {
            target: target.to_string(),
            operator: operator.to_string(),
        }
    }
}
