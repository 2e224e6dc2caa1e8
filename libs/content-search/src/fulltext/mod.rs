//! Full-text phrase analysis: Parse -> Transform -> Filter.
//!
//! Matching against the word index happens in the full-text criterion
//! handler; this module only turns a phrase into normalized tokens and
//! applies the stopword threshold.

mod parser;
mod processor;
mod rule;
mod tokenizer;

pub use parser::parse_rules;
pub use processor::TransformationProcessor;
pub use rule::{Replacement, RulePattern, TransformationRule};
pub use tokenizer::{tokenize, Token, WordMatch, WILDCARD};

pub(crate) use tokenizer::escape_like;

use crate::config::FullTextSearchConfig;
use crate::Result;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Outcome of analyzing a phrase before frequency filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseAnalysis {
    /// Blank phrase; the criterion matches every content item.
    MatchAll,
    /// Normalized tokens in phrase order, deduplicated. May be empty, in
    /// which case nothing matches.
    Tokens(Vec<Token>),
}

impl PhraseAnalysis {
    pub fn tokens(&self) -> &[Token] {
        match self {
            Self::MatchAll => &[],
            Self::Tokens(tokens) => tokens,
        }
    }
}

/// Tokenizes and normalizes phrases with one immutable rule set and config.
#[derive(Debug, Clone)]
pub struct FullTextAnalyzer {
    processor: Arc<TransformationProcessor>,
    config: FullTextSearchConfig,
}

impl FullTextAnalyzer {
    pub fn new(processor: Arc<TransformationProcessor>, config: FullTextSearchConfig) -> Result<Self> {
        processor.check_commands(&config.commands)?;
        Ok(Self { processor, config })
    }

    /// Bundled rules plus every file in `config.rule_files`.
    pub fn from_config(config: FullTextSearchConfig) -> Result<Self> {
        let mut processor = TransformationProcessor::with_default_rules()?;
        for path in &config.rule_files {
            processor.load_rule_file(path)?;
        }
        Self::new(Arc::new(processor), config)
    }

    pub fn config(&self) -> &FullTextSearchConfig {
        &self.config
    }

    pub fn analyze(&self, phrase: &str) -> PhraseAnalysis {
        if phrase.trim().is_empty() {
            return PhraseAnalysis::MatchAll;
        }

        let mut seen = HashSet::new();
        let mut tokens = Vec::new();
        for raw in tokenize(phrase, self.config.enable_wildcards) {
            for token in self.normalize(raw) {
                if seen.insert(token.clone()) {
                    tokens.push(token);
                }
            }
        }

        tracing::debug!(phrase, tokens = ?tokens, "Analyzed full-text phrase");
        PhraseAnalysis::Tokens(tokens)
    }

    /// Words whose corpus frequency is needed to apply the threshold.
    /// Empty when the threshold is disabled.
    pub fn frequency_candidates(&self, phrase: &str) -> Vec<String> {
        if !self.config.has_threshold() {
            return Vec::new();
        }
        self.analyze(phrase)
            .tokens()
            .iter()
            .filter(|t| !t.kind.is_wildcard())
            .map(|t| t.text.clone())
            .collect()
    }

    /// Drop exact tokens whose corpus frequency exceeds the threshold.
    /// Wildcard tokens are bounded in the query instead.
    pub fn filter_stopwords(&self, tokens: &[Token], frequencies: &HashMap<String, u64>) -> Vec<Token> {
        if !self.config.has_threshold() {
            return tokens.to_vec();
        }
        let threshold = self.config.search_threshold_value;
        tokens
            .iter()
            .filter(|t| {
                let frequency = frequencies.get(&t.text).copied().unwrap_or(0);
                let keep = t.kind.is_wildcard() || frequency <= threshold;
                if !keep {
                    tracing::debug!(word = %t.text, frequency, threshold, "Dropping stopword");
                }
                keep
            })
            .cloned()
            .collect()
    }

    fn normalize(&self, raw: Token) -> Vec<Token> {
        let transformed = self.processor.transform(&raw.text, &self.config.commands);
        let parts: Vec<&str> = transformed.split_whitespace().collect();
        let last = parts.len().saturating_sub(1);
        let leading = matches!(raw.kind, WordMatch::Suffix | WordMatch::Contains);
        let trailing = matches!(raw.kind, WordMatch::Prefix | WordMatch::Contains);

        parts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let kind = match (leading && i == 0, trailing && i == last) {
                    (false, false) => WordMatch::Exact,
                    (false, true) => WordMatch::Prefix,
                    (true, false) => WordMatch::Suffix,
                    (true, true) => WordMatch::Contains,
                };
                Token {
                    text: text.to_string(),
                    kind,
                }
            })
            .collect()
    }
}
