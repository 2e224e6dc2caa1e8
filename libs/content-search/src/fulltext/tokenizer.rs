use serde::Serialize;

pub const WILDCARD: char = '*';

/// How a token is matched against the word index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordMatch {
    Exact,
    /// `word*`
    Prefix,
    /// `*word`
    Suffix,
    /// `*word*`
    Contains,
}

impl WordMatch {
    fn from_markers(leading: bool, trailing: bool) -> Self {
        match (leading, trailing) {
            (false, false) => Self::Exact,
            (false, true) => Self::Prefix,
            (true, false) => Self::Suffix,
            (true, true) => Self::Contains,
        }
    }

    pub fn is_wildcard(self) -> bool {
        !matches!(self, Self::Exact)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub text: String,
    pub kind: WordMatch,
}

impl Token {
    pub fn exact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: WordMatch::Exact,
        }
    }

    /// SQL `LIKE` pattern for wildcard tokens, with `%`, `_` and `\` escaped.
    pub fn like_pattern(&self) -> String {
        let escaped = escape_like(&self.text);
        match self.kind {
            WordMatch::Exact => escaped,
            WordMatch::Prefix => format!("{}%", escaped),
            WordMatch::Suffix => format!("%{}", escaped),
            WordMatch::Contains => format!("%{}%", escaped),
        }
    }
}

pub(crate) fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn is_separator(c: char) -> bool {
    c != WILDCARD && !c.is_alphanumeric()
}

/// Split a phrase on whitespace and punctuation. The wildcard marker is kept
/// inside tokens; with wildcards enabled a leading or trailing marker becomes
/// the token's match kind, otherwise it stays part of the literal text.
pub fn tokenize(phrase: &str, enable_wildcards: bool) -> Vec<Token> {
    phrase
        .split(is_separator)
        .filter(|raw| !raw.is_empty())
        .filter_map(|raw| {
            if !enable_wildcards {
                return Some(Token::exact(raw));
            }
            let leading = raw.starts_with(WILDCARD);
            let trailing = raw.ends_with(WILDCARD);
            let text = raw.trim_matches(WILDCARD);
            if text.is_empty() {
                return None;
            }
            Some(Token {
                text: text.to_string(),
                kind: WordMatch::from_markers(leading, trailing),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_and_punctuation() {
        let tokens = tokenize("  applied, web-page.  ", true);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["applied", "web", "page"]);
        assert!(tokens.iter().all(|t| t.kind == WordMatch::Exact));
    }

    #[test]
    fn wildcard_markers_set_match_kind() {
        let tokens = tokenize("applie* *page *eb* *", true);
        assert_eq!(
            tokens,
            vec![
                Token {
                    text: "applie".to_string(),
                    kind: WordMatch::Prefix
                },
                Token {
                    text: "page".to_string(),
                    kind: WordMatch::Suffix
                },
                Token {
                    text: "eb".to_string(),
                    kind: WordMatch::Contains
                },
            ]
        );
    }

    #[test]
    fn wildcard_is_literal_when_disabled() {
        let tokens = tokenize("applie*", false);
        assert_eq!(tokens, vec![Token::exact("applie*")]);
    }

    #[test]
    fn punctuation_only_phrase_has_no_tokens() {
        assert!(tokenize("?!, ...", true).is_empty());
    }

    #[test]
    fn like_patterns_escape_metacharacters() {
        let token = Token {
            text: "50%_off".to_string(),
            kind: WordMatch::Prefix,
        };
        assert_eq!(token.like_pattern(), "50\\%\\_off%");
    }
}
