// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for GSS source text.
//!
//! Produces a flat token list including whitespace and comments, which the
//! parser needs to tell descendant combinators apart and to attach comments
//! to nodes. Every token records its byte span in the source.

use std::sync::Arc;

use gss_core::{SourceCode, SourceLocation};
use memchr::memmem;

use crate::nodes::Quote;
use crate::parser::ParserError;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokType {
    Ident,
    AtKeyword,
    Hash,
    Number,
    String,
    /// An unquoted `url(...)`.
    Url,
    /// An identifier immediately followed by `(`.
    Function,
    Delim,
    Whitespace,
    Comment,
    Colon,
    Semicolon,
    Comma,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    /// Placed after the last token by the parser; never produced here.
    EndMarker,
}

/// A token and its byte span `[start, end)`.
///
/// `value` depends on the kind: the name for identifiers, at-keywords, hashes
/// and functions (without `@`, `#` or `(`), the decoded contents for strings,
/// the trimmed address for urls, and the source text for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokType,
    pub value: String,
    pub start: usize,
    pub end: usize,
    /// For numbers: byte length of the numeric part of `value`; the rest is
    /// the unit.
    pub number_len: usize,
    pub quote: Quote,
}

impl Token {
    fn new(kind: TokType, value: impl Into<String>, start: usize, end: usize) -> Self {
        Token {
            kind,
            value: value.into(),
            start,
            end,
            number_len: 0,
            quote: Quote::Double,
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokType::Whitespace | TokType::Comment)
    }

    pub fn is_delim(&self, c: char) -> bool {
        self.kind == TokType::Delim && self.value.starts_with(c)
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokType::Whitespace => "whitespace".to_string(),
            TokType::Comment => "comment".to_string(),
            TokType::String => "string".to_string(),
            TokType::AtKeyword => format!("'@{}'", self.value),
            TokType::Hash => format!("'#{}'", self.value),
            TokType::Function => format!("'{}('", self.value),
            TokType::Url => "url()".to_string(),
            TokType::EndMarker => "end of input".to_string(),
            _ => format!("'{}'", self.value),
        }
    }
}

/// Tokenize a whole source buffer.
pub fn tokenize(source: &Arc<SourceCode>) -> Result<Vec<Token>, ParserError> {
    Tokenizer::new(source).tokenize()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

fn starts_ident(first: Option<char>, second: Option<char>) -> bool {
    match (first, second) {
        (Some('-'), Some(c)) => is_ident_start(c) || c == '-' || c == '\\',
        (Some('\\'), Some(c)) => c != '\n',
        (Some(c), _) => is_ident_start(c),
        _ => false,
    }
}

fn starts_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    let digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
    match first {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => digit(second),
        Some('+' | '-') => digit(second) || (second == Some('.') && digit(third)),
        _ => false,
    }
}

pub struct Tokenizer<'s> {
    source: &'s Arc<SourceCode>,
    text: &'s str,
    pos: usize,
}

impl<'s> Tokenizer<'s> {
    pub fn new(source: &'s Arc<SourceCode>) -> Self {
        Tokenizer {
            source,
            text: source.text(),
            pos: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, ParserError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn location(&self, start: usize, end: usize) -> SourceLocation {
        SourceLocation::from_offsets(self.source, start, end)
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParserError> {
        let start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        let token = match c {
            c if is_whitespace(c) => {
                while self.peek().is_some_and(is_whitespace) {
                    self.advance();
                }
                Token::new(TokType::Whitespace, " ", start, self.pos)
            }
            '/' if self.peek_at(1) == Some('*') => self.consume_comment()?,
            '"' | '\'' => self.consume_string(c)?,
            '#' if self.peek_at(1).is_some_and(|n| is_ident_char(n) || n == '\\') => {
                self.advance();
                self.consume_name();
                Token::new(TokType::Hash, &self.text[start + 1..self.pos], start, self.pos)
            }
            '@' if starts_ident(self.peek_at(1), self.peek_at(2)) => {
                self.advance();
                self.consume_name();
                Token::new(
                    TokType::AtKeyword,
                    &self.text[start + 1..self.pos],
                    start,
                    self.pos,
                )
            }
            'u' | 'U'
                if self.peek_at(1) == Some('+')
                    && self
                        .peek_at(2)
                        .is_some_and(|n| n.is_ascii_hexdigit() || n == '?') =>
            {
                self.consume_unicode_range()
            }
            _ if starts_number(c.into(), self.peek_at(1), self.peek_at(2)) => self.consume_number(),
            _ if starts_ident(Some(c), self.peek_at(1)) => self.consume_ident_like()?,
            _ => {
                self.advance();
                let kind = match c {
                    ':' => TokType::Colon,
                    ';' => TokType::Semicolon,
                    ',' => TokType::Comma,
                    '{' => TokType::LeftBrace,
                    '}' => TokType::RightBrace,
                    '(' => TokType::LeftParen,
                    ')' => TokType::RightParen,
                    '[' => TokType::LeftBracket,
                    ']' => TokType::RightBracket,
                    _ => TokType::Delim,
                };
                Token::new(kind, &self.text[start..self.pos], start, self.pos)
            }
        };
        Ok(Some(token))
    }

    fn consume_comment(&mut self) -> Result<Token, ParserError> {
        let start = self.pos;
        let body = &self.text.as_bytes()[start + 2..];
        match memmem::find(body, b"*/") {
            Some(offset) => {
                self.pos = start + 2 + offset + 2;
                Ok(Token::new(
                    TokType::Comment,
                    &self.text[start..self.pos],
                    start,
                    self.pos,
                ))
            }
            None => Err(ParserError::UnterminatedComment {
                location: self.location(start, self.text.len()),
            }),
        }
    }

    fn consume_string(&mut self, quote: char) -> Result<Token, ParserError> {
        let start = self.pos;
        self.advance();
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(ParserError::UnterminatedString {
                        location: self.location(start, self.pos),
                    })
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        None => {}
                        Some('\n') => {
                            self.advance();
                        }
                        Some(c) if c.is_ascii_hexdigit() => value.push(self.consume_hex_escape()),
                        Some(c) => {
                            self.advance();
                            value.push(c);
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
        let mut token = Token::new(TokType::String, value, start, self.pos);
        token.quote = if quote == '\'' {
            Quote::Single
        } else {
            Quote::Double
        };
        Ok(token)
    }

    /// Up to six hex digits and one optional trailing whitespace char.
    fn consume_hex_escape(&mut self) -> char {
        let start = self.pos;
        while self.pos - start < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.advance();
        }
        let code = u32::from_str_radix(&self.text[start..self.pos], 16).unwrap_or(0xFFFD);
        if self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
        match char::from_u32(code) {
            Some(c) if code != 0 => c,
            _ => char::REPLACEMENT_CHARACTER,
        }
    }

    /// Identifier characters and escapes, kept as written.
    fn consume_name(&mut self) {
        loop {
            match self.peek() {
                Some(c) if is_ident_char(c) => {
                    self.advance();
                }
                Some('\\') if self.peek_at(1).is_some_and(|n| n != '\n') => {
                    self.advance();
                    self.advance();
                }
                _ => break,
            }
        }
    }

    fn consume_number(&mut self) -> Token {
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.advance();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent = match (self.peek_at(1), self.peek_at(2)) {
                (Some(d), _) if d.is_ascii_digit() => true,
                (Some('+' | '-'), Some(d)) => d.is_ascii_digit(),
                _ => false,
            };
            if exponent {
                self.advance();
                self.advance();
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
        let number_len = self.pos - start;
        if self.peek() == Some('%') {
            self.advance();
        } else if starts_ident(self.peek(), self.peek_at(1)) {
            self.consume_name();
        }
        let mut token = Token::new(TokType::Number, &self.text[start..self.pos], start, self.pos);
        token.number_len = number_len;
        token
    }

    fn consume_unicode_range(&mut self) -> Token {
        let start = self.pos;
        self.advance();
        self.advance();
        let hex_or_wildcard = |c: char| c.is_ascii_hexdigit() || c == '?';
        while self.peek().is_some_and(hex_or_wildcard) {
            self.advance();
        }
        if self.peek() == Some('-') && self.peek_at(1).is_some_and(|c| c.is_ascii_hexdigit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
        }
        Token::new(TokType::Ident, &self.text[start..self.pos], start, self.pos)
    }

    fn consume_ident_like(&mut self) -> Result<Token, ParserError> {
        let text = self.text;
        let start = self.pos;
        self.consume_name();
        let name = &text[start..self.pos];
        if self.peek() != Some('(') {
            return Ok(Token::new(TokType::Ident, name, start, self.pos));
        }
        self.advance();
        if name.eq_ignore_ascii_case("url") {
            let rest = &text[self.pos..];
            let next = rest.trim_start_matches(is_whitespace).chars().next();
            if !matches!(next, Some('"' | '\'')) {
                return self.consume_url(start);
            }
        }
        Ok(Token::new(TokType::Function, name, start, self.pos))
    }

    /// The body of an unquoted `url(`, up to and including `)`.
    fn consume_url(&mut self, start: usize) -> Result<Token, ParserError> {
        let body_start = self.pos;
        loop {
            match self.peek() {
                Some(')') => break,
                None | Some('(' | '"' | '\'') => {
                    return Err(ParserError::UnterminatedUrl {
                        location: self.location(start, self.pos),
                    })
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let address = self.text[body_start..self.pos].trim_matches(is_whitespace);
        let address = address.to_string();
        self.advance();
        Ok(Token::new(TokType::Url, address, start, self.pos))
    }
}
