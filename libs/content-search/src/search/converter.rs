//! Criterion tree -> query fragment translation.

use super::handlers::CriterionHandler;
use super::query_builder::QueryFragment;
use crate::criterion::{Criterion, CriterionKind, FieldTarget};
use crate::models::FieldDefinition;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Facts resolved from the store before conversion, for one search call.
#[derive(Debug, Clone, Default)]
pub struct ConversionContext {
    field_definitions: HashMap<FieldTarget, Vec<FieldDefinition>>,
    word_frequencies: HashMap<String, u64>,
}

impl ConversionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_definitions(mut self, target: FieldTarget, definitions: Vec<FieldDefinition>) -> Self {
        self.insert_field_definitions(target, definitions);
        self
    }

    pub fn with_word_frequencies(mut self, frequencies: HashMap<String, u64>) -> Self {
        self.word_frequencies.extend(frequencies);
        self
    }

    pub(crate) fn insert_field_definitions(&mut self, target: FieldTarget, definitions: Vec<FieldDefinition>) {
        self.field_definitions.insert(target, definitions);
    }

    pub fn has_field_definitions(&self, target: &FieldTarget) -> bool {
        self.field_definitions.contains_key(target)
    }

    pub fn field_definitions(&self, target: &FieldTarget) -> Result<&[FieldDefinition]> {
        match self.field_definitions.get(target) {
            Some(defs) if !defs.is_empty() => Ok(defs),
            _ => Err(Error::FieldNotFound {
                content_type: target.content_type.clone(),
                field: target.field.clone(),
            }),
        }
    }

    pub fn word_frequencies(&self) -> &HashMap<String, u64> {
        &self.word_frequencies
    }
}

/// Routes each criterion node to the one handler that accepts it.
#[derive(Clone)]
pub struct CriteriaConverter {
    handlers: Vec<Arc<dyn CriterionHandler>>,
}

impl CriteriaConverter {
    /// Fails with `ConflictingHandlers` if two handlers claim the same kind.
    pub fn new(handlers: Vec<Arc<dyn CriterionHandler>>) -> Result<Self> {
        let mut claimed: HashMap<CriterionKind, &'static str> = HashMap::new();
        for handler in &handlers {
            for kind in handler.kinds() {
                if let Some(previous) = claimed.insert(*kind, handler.name()) {
                    return Err(Error::ConflictingHandlers(format!(
                        "{:?} is claimed by both {} and {}",
                        kind,
                        previous,
                        handler.name()
                    )));
                }
            }
        }
        Ok(Self { handlers })
    }

    pub fn handlers(&self) -> &[Arc<dyn CriterionHandler>] {
        &self.handlers
    }

    pub fn convert(&self, criterion: &Criterion, ctx: &ConversionContext) -> Result<QueryFragment> {
        let handler = self.handler_for(criterion)?;
        let children = criterion
            .children()
            .iter()
            .map(|child| self.convert(child, ctx))
            .collect::<Result<Vec<_>>>()?;
        handler.handle(criterion, children, ctx)
    }

    fn handler_for(&self, criterion: &Criterion) -> Result<&Arc<dyn CriterionHandler>> {
        let mut accepting = self.handlers.iter().filter(|h| h.accepts(criterion));
        let Some(first) = accepting.next() else {
            return Err(Error::NoHandlerFound(criterion.to_string()));
        };
        let others = accepting.count();
        if others > 0 {
            return Err(Error::AmbiguousHandler {
                criterion: criterion.to_string(),
                candidates: others + 1,
            });
        }
        tracing::debug!(criterion = %criterion, handler = first.name(), "Dispatching criterion");
        Ok(first)
    }
}

impl std::fmt::Debug for CriteriaConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.handlers.iter().map(|h| h.name()).collect();
        f.debug_struct("CriteriaConverter").field("handlers", &names).finish()
    }
}
