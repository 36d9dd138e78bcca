// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use gss_core::SourceCode;

use super::{tokenize, TokType};
use crate::nodes::Quote;
use crate::parser::ParserError;

fn tokenize_all(text: &str) -> Result<Vec<(TokType, String)>, ParserError> {
    let source = SourceCode::shared("test.gss", text);
    Ok(tokenize(&source)?
        .into_iter()
        .map(|t| (t.kind, t.value))
        .collect())
}

fn tok(kind: TokType, value: &str) -> (TokType, String) {
    (kind, value.to_string())
}

#[test]
fn test_simple_ruleset() {
    assert_eq!(
        tokenize_all(".a{color:red}"),
        Ok(vec![
            tok(TokType::Delim, "."),
            tok(TokType::Ident, "a"),
            tok(TokType::LeftBrace, "{"),
            tok(TokType::Ident, "color"),
            tok(TokType::Colon, ":"),
            tok(TokType::Ident, "red"),
            tok(TokType::RightBrace, "}"),
        ])
    );
}

#[test]
fn test_whitespace_collapses() {
    assert_eq!(
        tokenize_all("a \n\t b"),
        Ok(vec![
            tok(TokType::Ident, "a"),
            tok(TokType::Whitespace, " "),
            tok(TokType::Ident, "b"),
        ])
    );
}

#[test]
fn test_numbers_and_units() {
    let source = SourceCode::shared("n.gss", "10px -2.5em .5 50% 1e3");
    let tokens: Vec<_> = tokenize(&source)
        .expect("tokenize")
        .into_iter()
        .filter(|t| t.kind == TokType::Number)
        .map(|t| (t.value[..t.number_len].to_string(), t.value[t.number_len..].to_string()))
        .collect();
    assert_eq!(
        tokens,
        vec![
            ("10".to_string(), "px".to_string()),
            ("-2.5".to_string(), "em".to_string()),
            (".5".to_string(), String::new()),
            ("50".to_string(), "%".to_string()),
            ("1e3".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_identifiers() {
    assert_eq!(
        tokenize_all("-webkit-box --custom _private é"),
        Ok(vec![
            tok(TokType::Ident, "-webkit-box"),
            tok(TokType::Whitespace, " "),
            tok(TokType::Ident, "--custom"),
            tok(TokType::Whitespace, " "),
            tok(TokType::Ident, "_private"),
            tok(TokType::Whitespace, " "),
            tok(TokType::Ident, "é"),
        ])
    );
}

#[test]
fn test_strings_are_decoded() {
    let source = SourceCode::shared("s.gss", r#"'it\'s' "a\"b" "\201C" "line\
end""#);
    let strings: Vec<_> = tokenize(&source)
        .expect("tokenize")
        .into_iter()
        .filter(|t| t.kind == TokType::String)
        .map(|t| (t.value, t.quote))
        .collect();
    assert_eq!(
        strings,
        vec![
            ("it's".to_string(), Quote::Single),
            ("a\"b".to_string(), Quote::Double),
            ("\u{201C}".to_string(), Quote::Double),
            ("lineend".to_string(), Quote::Double),
        ]
    );
}

#[test]
fn test_unterminated_string() {
    assert!(matches!(
        tokenize_all("a { content: \"oops\n }"),
        Err(ParserError::UnterminatedString { .. })
    ));
}

#[test]
fn test_comments() {
    assert_eq!(
        tokenize_all("/* one */a/**/"),
        Ok(vec![
            tok(TokType::Comment, "/* one */"),
            tok(TokType::Ident, "a"),
            tok(TokType::Comment, "/**/"),
        ])
    );
    assert!(matches!(
        tokenize_all("a /* never closed"),
        Err(ParserError::UnterminatedComment { .. })
    ));
}

#[test]
fn test_at_keywords_and_hashes() {
    assert_eq!(
        tokenize_all("@media #fff #main @"),
        Ok(vec![
            tok(TokType::AtKeyword, "media"),
            tok(TokType::Whitespace, " "),
            tok(TokType::Hash, "fff"),
            tok(TokType::Whitespace, " "),
            tok(TokType::Hash, "main"),
            tok(TokType::Whitespace, " "),
            tok(TokType::Delim, "@"),
        ])
    );
}

#[test]
fn test_urls() {
    assert_eq!(
        tokenize_all("url( images/a.png ) url(\"b.png\")"),
        Ok(vec![
            tok(TokType::Url, "images/a.png"),
            tok(TokType::Whitespace, " "),
            tok(TokType::Function, "url"),
            tok(TokType::String, "b.png"),
            tok(TokType::RightParen, ")"),
        ])
    );
    assert!(matches!(
        tokenize_all("url(a.png"),
        Err(ParserError::UnterminatedUrl { .. })
    ));
}

#[test]
fn test_functions() {
    assert_eq!(
        tokenize_all("rgba(0,0)"),
        Ok(vec![
            tok(TokType::Function, "rgba"),
            tok(TokType::Number, "0"),
            tok(TokType::Comma, ","),
            tok(TokType::Number, "0"),
            tok(TokType::RightParen, ")"),
        ])
    );
}

#[test]
fn test_unicode_range() {
    assert_eq!(
        tokenize_all("U+0025-00FF u+4??"),
        Ok(vec![
            tok(TokType::Ident, "U+0025-00FF"),
            tok(TokType::Whitespace, " "),
            tok(TokType::Ident, "u+4??"),
        ])
    );
}

#[test]
fn test_spans() {
    let source = SourceCode::shared("p.gss", "a { b: c }");
    let tokens = tokenize(&source).expect("tokenize");
    for token in &tokens {
        assert!(token.start < token.end);
        assert!(token.end <= source.text().len());
    }
    assert_eq!(tokens.last().map(|t| t.end), Some(source.text().len()));
}
