//! Parser for transformation rule sources (`.tr` files).
//!
//! ```text
//! # comment
//! latin1_noaccent:
//! U+00E9 = "e"
//! U+00C6 = "AE"
//! "ß" = "ss"
//! U+00AD = remove
//! U+00E0 - U+00E5 = "a"
//! ascii_lowercase:
//! U+0041 - U+005A + 20
//! ```

use super::rule::{Replacement, RulePattern, TransformationRule};
use crate::{Error, Result};

pub fn parse_rules(source_name: &str, text: &str) -> Result<Vec<TransformationRule>> {
    let mut rules = Vec::new();
    let mut command: Option<String> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_suffix(':') {
            let name = name.trim();
            if !is_command_name(name) {
                return Err(syntax(source_name, line_no, format!("invalid command name '{}'", name)));
            }
            command = Some(name.to_string());
            continue;
        }

        let Some(current) = command.as_ref() else {
            return Err(syntax(source_name, line_no, "rule appears before any command header"));
        };

        let mut cursor = Cursor::new(line);
        let (pattern, replacement) = parse_rule(&mut cursor)
            .map_err(|message| syntax(source_name, line_no, message))?;
        rules.push(TransformationRule {
            command: current.clone(),
            pattern,
            replacement,
        });
    }

    Ok(rules)
}

fn syntax(source_name: &str, line: usize, message: impl Into<String>) -> Error {
    Error::RuleSyntax {
        source_name: source_name.to_string(),
        line,
        message: message.into(),
    }
}

fn is_command_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

type ParseResult<T> = std::result::Result<T, String>;

fn parse_rule(cursor: &mut Cursor<'_>) -> ParseResult<(RulePattern, Replacement)> {
    let pattern = if cursor.peek_char() == Some('"') {
        RulePattern::Literal(cursor.quoted()?)
    } else {
        let start = cursor.char_ref()?;
        cursor.skip_ws();
        if cursor.peek_char() == Some('-') && cursor.after_dash_is_char_ref() {
            cursor.consume_char();
            cursor.skip_ws();
            let end = cursor.char_ref()?;
            if end < start {
                return Err(format!(
                    "range end U+{:04X} is before start U+{:04X}",
                    end as u32, start as u32
                ));
            }
            RulePattern::CharRange { start, end }
        } else {
            RulePattern::Literal(start.to_string())
        }
    };

    cursor.skip_ws();
    let replacement = match cursor.consume_char() {
        Some('=') => {
            cursor.skip_ws();
            if cursor.peek_char() == Some('"') {
                Replacement::Text(cursor.quoted()?)
            } else if cursor.eat_keyword("remove") {
                Replacement::Text(String::new())
            } else {
                Replacement::Text(cursor.char_ref()?.to_string())
            }
        }
        Some(sign @ ('+' | '-')) => {
            cursor.skip_ws();
            let offset = cursor.hex_number()?;
            Replacement::Shift(if sign == '-' { -offset } else { offset })
        }
        Some(other) => return Err(format!("expected '=', '+' or '-', found '{}'", other)),
        None => return Err("missing replacement".to_string()),
    };

    cursor.skip_ws();
    match cursor.peek_char() {
        None | Some('#') => Ok((pattern, replacement)),
        Some(other) => Err(format!("unexpected trailing input at '{}'", other)),
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.consume_char();
        }
    }

    fn after_dash_is_char_ref(&self) -> bool {
        self.remaining()
            .strip_prefix('-')
            .map(|rest| rest.trim_start().starts_with("U+"))
            .unwrap_or(false)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.remaining();
        let Some(after) = rest.strip_prefix(keyword) else {
            return false;
        };
        if after.chars().next().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }
        self.pos += keyword.len();
        true
    }

    fn hex_digits(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if c.is_ascii_hexdigit()) {
            self.consume_char();
        }
        &self.input[start..self.pos]
    }

    fn hex_number(&mut self) -> ParseResult<i64> {
        let digits = self.hex_digits();
        if digits.is_empty() || digits.len() > 6 {
            return Err(format!("expected a hexadecimal offset, found '{}'", digits));
        }
        i64::from_str_radix(digits, 16).map_err(|e| e.to_string())
    }

    fn char_ref(&mut self) -> ParseResult<char> {
        if !self.remaining().starts_with("U+") {
            let found: String = self.remaining().chars().take(8).collect();
            return Err(format!("expected a U+XXXX character, found '{}'", found));
        }
        self.pos += 2;
        let digits = self.hex_digits();
        if digits.is_empty() || digits.len() > 6 {
            return Err(format!("invalid code point 'U+{}'", digits));
        }
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| format!("invalid code point 'U+{}'", digits))
    }

    fn quoted(&mut self) -> ParseResult<String> {
        if self.consume_char() != Some('"') {
            return Err("expected '\"'".to_string());
        }
        let mut out = String::new();
        let mut escaped = false;
        while let Some(c) = self.consume_char() {
            if escaped {
                out.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '"' => return Ok(out),
                _ => out.push(c),
            }
        }
        Err("unterminated string".to_string())
    }
}
