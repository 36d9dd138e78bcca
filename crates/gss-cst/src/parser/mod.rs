// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parser producing a [`CssTree`] from GSS source text.
//!
//! At-rules come out of the parser as [`UnknownAtRule`] nodes; the passes in
//! [`crate::passes`] turn them into typed nodes.
//!
//! [`UnknownAtRule`]: crate::nodes::UnknownAtRule

mod errors;
mod grammar;

use std::sync::Arc;

use gss_core::SourceCode;
use tracing::debug;

use crate::nodes::CssTree;
use crate::tokenizer::tokenize;

pub use errors::ParserError;

/// Parse a whole source buffer.
pub fn parse_stylesheet(source: &Arc<SourceCode>) -> Result<CssTree, ParserError> {
    let tokens = tokenize(source)?;
    debug!(
        file = source.file_name(),
        tokens = tokens.len(),
        "tokenized"
    );
    let tokens = grammar::TokVec::new(tokens, source.text().len());
    grammar::gss::stylesheet(&tokens, source)
        .map_err(|err| ParserError::from_parse_error(err, &tokens, source))
}

/// Parse `text` as a file named `file_name`.
pub fn parse_str(file_name: &str, text: &str) -> Result<CssTree, ParserError> {
    parse_stylesheet(&SourceCode::shared(file_name, text))
}
