use std::fmt;

/// Left-hand side of a transformation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulePattern {
    /// Exact character sequence.
    Literal(String),
    /// Any single character in the inclusive range.
    CharRange { start: char, end: char },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    Text(String),
    /// Transpose the matched character by a code point offset.
    Shift(i64),
}

/// One rule of a transformation command, e.g. `latin1_noaccent: U+00E9 = "e"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationRule {
    pub command: String,
    pub pattern: RulePattern,
    pub replacement: Replacement,
}

impl TransformationRule {
    /// Try the rule at the start of `input`. Returns the consumed byte length
    /// and the output on a match.
    pub fn apply_at(&self, input: &str) -> Option<(usize, String)> {
        match &self.pattern {
            RulePattern::Literal(lit) => {
                if lit.is_empty() || !input.starts_with(lit.as_str()) {
                    return None;
                }
                let output = match &self.replacement {
                    Replacement::Text(text) => text.clone(),
                    Replacement::Shift(offset) => lit.chars().filter_map(|c| shift(c, *offset)).collect(),
                };
                Some((lit.len(), output))
            }
            RulePattern::CharRange { start, end } => {
                let c = input.chars().next()?;
                if c < *start || c > *end {
                    return None;
                }
                let output = match &self.replacement {
                    Replacement::Text(text) => text.clone(),
                    Replacement::Shift(offset) => shift(c, *offset).map(String::from).unwrap_or_default(),
                };
                Some((c.len_utf8(), output))
            }
        }
    }
}

fn shift(c: char, offset: i64) -> Option<char> {
    let code = c as i64 + offset;
    u32::try_from(code).ok().and_then(char::from_u32)
}

impl fmt::Display for TransformationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.command)?;
        match &self.pattern {
            RulePattern::Literal(lit) => write!(f, "{:?}", lit)?,
            RulePattern::CharRange { start, end } => {
                write!(f, "U+{:04X} - U+{:04X}", *start as u32, *end as u32)?
            }
        }
        match &self.replacement {
            Replacement::Text(text) if text.is_empty() => write!(f, " = remove"),
            Replacement::Text(text) => write!(f, " = {:?}", text),
            Replacement::Shift(offset) if *offset >= 0 => write!(f, " + {:X}", offset),
            Replacement::Shift(offset) => write!(f, " - {:X}", -offset),
        }
    }
}
