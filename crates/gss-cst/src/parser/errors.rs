// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use gss_core::diagnostics::render_diagnostic;
use gss_core::{GssDiagnostic, GssError, Severity, SourceCode, SourceLocation};
use peg::error::{ExpectedSet, ParseError};
use thiserror::Error;

use super::grammar::TokVec;
use crate::tokenizer::TokType;

/// A failure to turn source text into a tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("unterminated comment")]
    UnterminatedComment { location: SourceLocation },
    #[error("unterminated string")]
    UnterminatedString { location: SourceLocation },
    #[error("unterminated url()")]
    UnterminatedUrl { location: SourceLocation },
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        location: SourceLocation,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        expected: String,
        location: SourceLocation,
    },
}

impl ParserError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParserError::UnterminatedComment { location }
            | ParserError::UnterminatedString { location }
            | ParserError::UnterminatedUrl { location }
            | ParserError::UnexpectedToken { location, .. }
            | ParserError::UnexpectedEof { location, .. } => location,
        }
    }

    /// Convert a grammar failure at token index `err.location`.
    pub(crate) fn from_parse_error(
        err: ParseError<usize>,
        tokens: &TokVec,
        source: &Arc<SourceCode>,
    ) -> Self {
        let expected = describe_expected(&err.expected);
        match tokens.get(err.location) {
            Some(token) if token.kind != TokType::EndMarker => ParserError::UnexpectedToken {
                found: token.describe(),
                expected,
                location: SourceLocation::from_offsets(source, token.start, token.end),
            },
            _ => {
                let end = source.text().len();
                ParserError::UnexpectedEof {
                    expected,
                    location: SourceLocation::from_offsets(source, end, end),
                }
            }
        }
    }

    /// Render the error with a source excerpt pointing at the problem.
    pub fn render(&self) -> String {
        let diagnostic = GssDiagnostic::new(self.to_string(), self.location().clone());
        render_diagnostic(Severity::Error, &diagnostic)
    }
}

/// `a, b or c`, leaving out the quiet and built-in expectations.
fn describe_expected(expected: &ExpectedSet) -> String {
    let mut names: Vec<&str> = expected
        .tokens()
        .filter(|name| !name.is_empty() && !name.starts_with('[') && *name != "EOF")
        .collect();
    names.sort_unstable();
    names.dedup();
    match names.split_last() {
        None => "something else".to_string(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

impl From<ParserError> for GssError {
    fn from(err: ParserError) -> Self {
        GssError::Parse {
            message: format!("{}: {}", err.location(), err),
            rendered: err.render(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn expectations_are_listed() {
        let err = parse_str("t.gss", "a { b { c: d } }").unwrap_err();
        match &err {
            ParserError::UnexpectedToken {
                found, expected, ..
            } => {
                assert_eq!(found, "'{'");
                assert_eq!(expected, "':'");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.location().excerpt(), "{");
    }

    #[test]
    fn end_of_input_points_past_the_text() {
        let err = parse_str("t.gss", "a { color: red").unwrap_err();
        let ParserError::UnexpectedEof { expected, location } = &err else {
            panic!("expected end of input, got {:?}", err);
        };
        assert!(expected.contains("'}'"), "{}", expected);
        assert_eq!(location.end().byte_offset, "a { color: red".len());
        assert!(err.render().contains("unexpected end of input"));
    }
}
