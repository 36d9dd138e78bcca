// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Printers turning a tree back into CSS text.
//!
//! Both printers are read-only visitors. They expect a tree whose
//! conditional blocks have already been eliminated; meeting one stops the
//! printer and leaves the output incomplete.

mod compact;
mod pretty;

pub use compact::CompactPrinter;
pub use pretty::PrettyPrinter;

use crate::nodes::Quote;

/// Quote and escape a string value for output.
///
/// Characters that are significant in HTML are written as CSS hex escapes so
/// the stylesheet can be inlined in a `<style>` element.
pub(crate) fn escape_string(value: &str, quote: Quote) -> String {
    let q = quote.as_char();
    let mut out = String::with_capacity(value.len() + 2);
    out.push(q);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            '<' => out.push_str("\\3c "),
            '>' => out.push_str("\\3e "),
            '&' => out.push_str("\\26 "),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping() {
        assert_eq!(escape_string("plain", Quote::Double), "\"plain\"");
        assert_eq!(escape_string("a\"b", Quote::Double), "\"a\\\"b\"");
        assert_eq!(escape_string("a\"b", Quote::Single), "'a\"b'");
        assert_eq!(escape_string("it's", Quote::Single), "'it\\'s'");
        assert_eq!(escape_string("a\\b", Quote::Double), "\"a\\\\b\"");
        assert_eq!(
            escape_string("</style>&", Quote::Double),
            "\"\\3c /style\\3e \\26 \""
        );
        assert_eq!(escape_string("1\n2", Quote::Double), "\"1\\a 2\"");
    }
}
