//! # Parser Module
//!
//! Parses a staff-group hint string into [`HintToken`]s.
//!
//! ## Grammar
//! ```text
//! hint   := token (WS token)*
//! token  := group ('x' NUMBER)?
//! group  := '(' (item WS?)* ')'
//! item   := NUMBER | group
//! ```
//! `NUMBER` is a positive integer. A bare number is a run of sibling staves;
//! a nested group becomes a nested staff group. The repeat suffix is only
//! valid after the outermost group of a token.
//!
//! ## Two Stages
//! 1. [`split_hint`] cuts the hint at whitespace that is outside any
//!    parentheses, so `"(1) (2 (1 1))x2"` yields `"(1)"` and `"(2 (1 1))x2"`.
//! 2. Each piece is tokenized by the lexer and parsed by [`Parser`].
//!
//! ## Example
//! ```rust
//! use omrmei::parse_hint;
//!
//! let tokens = parse_hint("(1) (2 (1 1))x2").unwrap();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[1].repeat, 2);
//! assert_eq!(tokens[1].group.staff_count(), 4);
//! ```

use crate::ast::*;
use crate::error::ConvertError;
use crate::lexer::{Lexer, LocatedToken, Token};

/// Most staves one system may declare
pub const MAX_STAVES: u32 = 1024;
/// Most consecutive systems one token may repeat
pub const MAX_REPEAT: u32 = 1024;

/// Parse a whole hint string, one [`HintToken`] per top-level token.
pub fn parse_hint(hint: &str) -> Result<Vec<HintToken>, ConvertError> {
    split_hint(hint).into_iter().map(parse_token).collect()
}

/// Parse a single top-level token such as `(2 (1 1))x2`.
pub fn parse_token(source: &str) -> Result<HintToken, ConvertError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser::new(source, tokens);
    let (group, repeat) = parser.parse()?;

    let staves = group.staff_count();
    if staves > u64::from(MAX_STAVES) {
        return Err(ConvertError::Grammar {
            token: source.to_string(),
            column: 1,
            message: format!("System has {} staves, at most {} are allowed", staves, MAX_STAVES),
        });
    }

    Ok(HintToken {
        source: source.to_string(),
        group,
        repeat,
    })
}

/// Split a hint string at whitespace outside of parentheses.
pub fn split_hint(hint: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth: usize = 0;
    let mut start: Option<usize> = None;

    for (i, c) in hint.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    pieces.push(&hint[s..i]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        pieces.push(&hint[s..]);
    }

    pieces
}

/// Recursive-descent parser over the tokens of one hint token
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<LocatedToken>,
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<LocatedToken>) -> Self {
        Self {
            source,
            tokens,
            position: 0,
        }
    }

    fn current(&self) -> Option<&LocatedToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&LocatedToken> {
        let token = self.tokens.get(self.position);
        self.position += 1;
        token
    }

    fn skip_whitespace(&mut self) {
        while let Some(t) = self.current() {
            if t.token == Token::Whitespace {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Column of the current token, or one past the end of the source
    fn column(&self) -> usize {
        self.current()
            .map(|t| t.column)
            .unwrap_or_else(|| self.source.chars().count() + 1)
    }

    fn error(&self, column: usize, message: impl Into<String>) -> ConvertError {
        ConvertError::Grammar {
            token: self.source.to_string(),
            column,
            message: message.into(),
        }
    }

    /// Parse `group ('x' NUMBER)?` and require the end of input.
    pub fn parse(&mut self) -> Result<(ParsedGroup, u32), ConvertError> {
        match self.current().map(|t| &t.token) {
            Some(Token::LeftParen) => {
                self.advance();
            }
            Some(_) => return Err(self.error(self.column(), "Expected '(' to open a staff group")),
            None => return Err(self.error(1, "Empty staff group hint")),
        }

        let group = self.parse_group()?;
        let repeat = self.parse_repeat()?;

        if self.current().is_some() {
            return Err(self.error(self.column(), "Unexpected input after staff group"));
        }

        Ok((group, repeat))
    }

    /// Parse group items up to and including the matching ')'.
    /// The opening '(' has already been consumed.
    fn parse_group(&mut self) -> Result<ParsedGroup, ConvertError> {
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            let column = self.column();

            match self.advance().map(|t| t.token.clone()) {
                Some(Token::RightParen) => return Ok(ParsedGroup::new(items)),
                Some(Token::LeftParen) => items.push(GroupItem::Nested(self.parse_group()?)),
                Some(Token::Number(0)) => {
                    return Err(self.error(column, "Staff count must be a positive integer"));
                }
                Some(Token::Number(k)) if k > MAX_STAVES => {
                    return Err(self.error(
                        column,
                        format!("Staff count {} exceeds the limit of {}", k, MAX_STAVES),
                    ));
                }
                Some(Token::Number(k)) => items.push(GroupItem::Count(k)),
                Some(Token::Repeat) => {
                    return Err(self.error(
                        column,
                        "Repeat suffix is only allowed after the outermost group",
                    ));
                }
                Some(Token::Whitespace) => continue,
                None => return Err(self.error(column, "Unbalanced parentheses: missing ')'")),
            }
        }
    }

    /// Parse an optional `x<N>` suffix; absence means one system.
    fn parse_repeat(&mut self) -> Result<u32, ConvertError> {
        match self.current().map(|t| &t.token) {
            Some(Token::Repeat) => {
                self.advance();
            }
            Some(Token::RightParen) => {
                return Err(self.error(self.column(), "Unbalanced parentheses: unexpected ')'"));
            }
            _ => return Ok(1),
        }

        let column = self.column();
        match self.advance().map(|t| t.token.clone()) {
            Some(Token::Number(0)) => Err(self.error(column, "Repeat count must be a positive integer")),
            Some(Token::Number(n)) if n > MAX_REPEAT => Err(self.error(
                column,
                format!("Repeat count {} exceeds the limit of {}", n, MAX_REPEAT),
            )),
            Some(Token::Number(n)) => Ok(n),
            _ => Err(self.error(column, "Expected a repeat count after 'x'")),
        }
    }
}
