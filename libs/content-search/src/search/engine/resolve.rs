use super::SearchHandler;
use crate::criterion::{Criterion, FieldTarget, Target};
use crate::models::{SortClause, SortTarget};
use crate::search::converter::ConversionContext;
use crate::Result;

impl SearchHandler {
    /// Look up everything conversion needs from the store: field definitions
    /// for field criteria and field sort clauses, and corpus frequencies for
    /// exact full-text tokens.
    pub(super) async fn resolve_context(
        &self,
        criterion: &Criterion,
        sort: &[SortClause],
    ) -> Result<ConversionContext> {
        let mut field_targets: Vec<&FieldTarget> = Vec::new();
        let mut words: Vec<String> = Vec::new();

        criterion.walk(&mut |node| {
            if let Some(leaf) = node.as_leaf() {
                if let Target::Field(target) = leaf.target() {
                    field_targets.push(target);
                }
            } else if let Some(full_text) = node.as_full_text() {
                for word in self.analyzer.frequency_candidates(full_text.phrase()) {
                    if !words.contains(&word) {
                        words.push(word);
                    }
                }
            }
        });
        for clause in sort {
            if let SortTarget::Field(target) = &clause.target {
                field_targets.push(target);
            }
        }

        let mut ctx = ConversionContext::new();
        for target in field_targets {
            if ctx.has_field_definitions(target) {
                continue;
            }
            let definitions = self.gateway.field_definitions(target).await?;
            ctx.insert_field_definitions(target.clone(), definitions);
        }

        if !words.is_empty() {
            let frequencies = self.gateway.word_frequencies(&words).await?;
            ctx = ctx.with_word_frequencies(frequencies);
        }

        Ok(ctx)
    }
}
