use super::CriterionHandler;
use crate::criterion::{Criterion, CriterionKind, Value};
use crate::fulltext::{FullTextAnalyzer, PhraseAnalysis, Token, WordMatch};
use crate::search::converter::ConversionContext;
use crate::search::query_builder::{Comparison, Condition, Join, QueryFragment};
use crate::{Error, Result};
use std::sync::Arc;

/// Full-text phrases matched against the `search_word` index. Every surviving
/// token must be present (tokens are ANDed).
#[derive(Debug, Clone)]
pub struct FullTextHandler {
    analyzer: Arc<FullTextAnalyzer>,
}

impl FullTextHandler {
    pub fn new(analyzer: Arc<FullTextAnalyzer>) -> Self {
        Self { analyzer }
    }

    fn token_fragment(&self, token: &Token) -> QueryFragment {
        let word_condition = match token.kind {
            WordMatch::Exact => Condition::Compare {
                column: "word",
                op: Comparison::Eq,
                value: Value::Text(token.text.clone()),
            },
            _ => Condition::Like {
                column: "word",
                pattern: token.like_pattern(),
            },
        };

        let config = self.analyzer.config();
        let mut word_filter = vec![QueryFragment::from(word_condition)];
        if token.kind.is_wildcard() && config.has_threshold() {
            let threshold = i64::try_from(config.search_threshold_value).unwrap_or(i64::MAX);
            word_filter.push(
                Condition::Compare {
                    column: "object_count",
                    op: Comparison::Lte,
                    value: Value::Int(threshold),
                }
                .into(),
            );
        }

        let word = QueryFragment::join(
            Join::new("search_word", "id", "word_id"),
            QueryFragment::and(word_filter),
        );
        QueryFragment::join(Join::new("search_word_link", "content_id", "id"), word)
    }
}

impl CriterionHandler for FullTextHandler {
    fn name(&self) -> &'static str {
        "full_text"
    }

    fn kinds(&self) -> &'static [CriterionKind] {
        &[CriterionKind::FullText]
    }

    fn handle(
        &self,
        criterion: &Criterion,
        _children: Vec<QueryFragment>,
        ctx: &ConversionContext,
    ) -> Result<QueryFragment> {
        let full_text = criterion
            .as_full_text()
            .ok_or_else(|| Error::NoHandlerFound(criterion.to_string()))?;

        let tokens = match self.analyzer.analyze(full_text.phrase()) {
            PhraseAnalysis::MatchAll => return Ok(QueryFragment::MatchAll),
            PhraseAnalysis::Tokens(tokens) => tokens,
        };
        let tokens = self.analyzer.filter_stopwords(&tokens, ctx.word_frequencies());
        if tokens.is_empty() {
            tracing::debug!(phrase = full_text.phrase(), "No searchable tokens left in phrase");
            return Ok(QueryFragment::MatchNone);
        }

        Ok(QueryFragment::and(
            tokens.iter().map(|t| self.token_fragment(t)).collect(),
        ))
    }
}
