//! Field index bindings: which sort-key column a field type filters and sorts on.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Column family in `content_field` used for filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexColumn {
    SortKeyString,
    SortKeyInt,
}

impl IndexColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            Self::SortKeyString => "sort_key_string",
            Self::SortKeyInt => "sort_key_int",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Self::SortKeyInt)
    }
}

impl fmt::Display for IndexColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Per field-type contract consumed by the engine.
pub trait FieldValueConverter: Send + Sync {
    fn index_column(&self) -> IndexColumn;
}

/// Converter for field types that only need a fixed column.
#[derive(Debug, Clone, Copy)]
pub struct FixedColumn(pub IndexColumn);

impl FieldValueConverter for FixedColumn {
    fn index_column(&self) -> IndexColumn {
        self.0
    }
}

/// Registry of field value converters keyed by field type identifier.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn FieldValueConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock field types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for data_type in ["ezstring", "eztext", "ezemail", "ezurl", "ezkeyword", "ezisbn"] {
            registry.insert(data_type, Arc::new(FixedColumn(IndexColumn::SortKeyString)));
        }
        for data_type in [
            "ezinteger",
            "ezprice",
            "ezboolean",
            "ezdate",
            "ezdatetime",
            "eztime",
            "ezselection",
        ] {
            registry.insert(data_type, Arc::new(FixedColumn(IndexColumn::SortKeyInt)));
        }
        registry
    }

    /// Add a converter for a field type. A type can be registered once.
    pub fn register(
        &mut self,
        data_type: impl Into<String>,
        converter: Arc<dyn FieldValueConverter>,
    ) -> Result<()> {
        let data_type = data_type.into();
        if self.converters.contains_key(&data_type) {
            return Err(Error::ConflictingHandlers(format!(
                "field type '{}' already has a converter",
                data_type
            )));
        }
        tracing::debug!(
            data_type = %data_type,
            column = %converter.index_column(),
            "Registered field value converter"
        );
        self.insert(&data_type, converter);
        Ok(())
    }

    fn insert(&mut self, data_type: &str, converter: Arc<dyn FieldValueConverter>) {
        self.converters.insert(data_type.to_string(), converter);
    }

    pub fn get_converter(&self, data_type: &str) -> Result<Arc<dyn FieldValueConverter>> {
        self.converters
            .get(data_type)
            .cloned()
            .ok_or_else(|| Error::UnresolvedFieldType(data_type.to_string()))
    }

    pub fn index_column(&self, data_type: &str) -> Result<IndexColumn> {
        Ok(self.get_converter(data_type)?.index_column())
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.converters.keys().collect();
        types.sort();
        f.debug_struct("ConverterRegistry").field("types", &types).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_types_resolve_to_columns() {
        let registry = ConverterRegistry::with_defaults();
        assert_eq!(
            registry.index_column("ezstring").unwrap(),
            IndexColumn::SortKeyString
        );
        assert_eq!(registry.index_column("ezprice").unwrap(), IndexColumn::SortKeyInt);
    }

    #[test]
    fn unknown_type_is_an_error() {
        let registry = ConverterRegistry::with_defaults();
        let err = registry.get_converter("ezmedia").err().unwrap();
        assert!(matches!(err, Error::UnresolvedFieldType(t) if t == "ezmedia"));
    }

    #[test]
    fn custom_converter_can_be_registered() {
        struct Rating;
        impl FieldValueConverter for Rating {
            fn index_column(&self) -> IndexColumn {
                IndexColumn::SortKeyInt
            }
        }

        let mut registry = ConverterRegistry::new();
        registry.register("rating", Arc::new(Rating)).unwrap();
        assert_eq!(registry.index_column("rating").unwrap(), IndexColumn::SortKeyInt);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ConverterRegistry::with_defaults();
        let err = registry
            .register("ezstring", Arc::new(FixedColumn(IndexColumn::SortKeyInt)))
            .unwrap_err();
        assert!(matches!(err, Error::ConflictingHandlers(_)));
        // The stock converter is still in place
        assert_eq!(
            registry.index_column("ezstring").unwrap(),
            IndexColumn::SortKeyString
        );
    }
}
