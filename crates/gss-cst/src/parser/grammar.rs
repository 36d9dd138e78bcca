// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! PEG grammar over the token list.
//!
//! The grammar is deliberately permissive about at-rules: every `@name` is
//! parsed into an [`UnknownAtRule`] with a parameter list and an optional
//! block, and the compiler passes decide what it means. The only at-rule
//! specific knowledge here is which kind of block to create and how to read
//! `@if`/`@elseif` conditions and `@def` names.
//!
//! Whitespace and comments stay in the token list. Most rules skip them with
//! `trivia()`, but selectors need them to find descendant combinators and
//! function arguments need them to keep `calc(1px + 2em)` apart.

use std::sync::Arc;

use gss_core::{SourceCode, SourceLocation};
use peg::{Parse, ParseElem, RuleResult};

use crate::nodes::is_constant_name;
use crate::nodes::{
    AtRuleType, Block, BlockKind, BooleanExpression, Combinator, CombinatorKind,
    CompositeOperator, CompositeValue, ConstantReference, CssTree, Declaration, FunctionValue,
    Literal, Node, Numeric, Priority, Quote, Refiner, RefinerKind, Ruleset, Selector,
    StringValue, UnknownAtRule, Value,
};
use crate::tokenizer::{TokType, Token};

/// The tokens of one source buffer followed by an end marker.
#[derive(Debug)]
pub struct TokVec(Vec<Token>);

impl TokVec {
    /// Wrap `tokens`, appending the end marker at byte offset `end`.
    pub fn new(mut tokens: Vec<Token>, end: usize) -> Self {
        tokens.push(Token {
            kind: TokType::EndMarker,
            value: String::new(),
            start: end,
            end,
            number_len: 0,
            quote: Quote::Double,
        });
        TokVec(tokens)
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.0.get(index)
    }
}

impl Parse for TokVec {
    type PositionRepr = usize;

    fn start<'input>(&'input self) -> usize {
        0
    }

    fn is_eof<'input>(&'input self, pos: usize) -> bool {
        pos >= self.0.len()
    }

    /// Index of the offending token. Every expectation is recorded after the
    /// token that failed to match was taken, so that is the one before `pos`.
    fn position_repr<'input>(&'input self, pos: usize) -> usize {
        pos.saturating_sub(1).min(self.0.len().saturating_sub(1))
    }
}

impl<'input> ParseElem<'input> for TokVec {
    type Element = &'input Token;

    fn parse_elem(&'input self, pos: usize) -> RuleResult<&'input Token> {
        match self.0.get(pos) {
            Some(token) => RuleResult::Matched(pos + 1, token),
            None => RuleResult::Failed,
        }
    }
}

/// How identifiers and parentheses in a value list are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueMode {
    /// Declaration values and `@def` values: upper case identifiers are
    /// constant references.
    Declaration,
    /// At-rule parameters: `(ident)` is a boolean expression, other
    /// parenthesized groups are literals, `:name` is one literal.
    Prelude,
}

/// One piece of a function argument list.
enum Argument {
    Space,
    Separator(Value),
    Term(Value),
}

peg::parser! {
    pub grammar gss(source: &Arc<SourceCode>) for TokVec {

        // ====================================================================
        // Stylesheet and blocks
        // ====================================================================

        pub rule stylesheet() -> CssTree
            = children:item(true, false)* comments:leading()
              tok(TokType::EndMarker, "a ruleset or an at-rule")
            {
                let location = SourceLocation::from_offsets(source, 0, source.text().len());
                let body = Block {
                    kind: BlockKind::Generic,
                    children,
                    location: location.clone(),
                    comments,
                };
                CssTree::new(body, location)
            }

        /// A statement and the comments before it.
        rule item(rulesets: bool, declarations: bool) -> Node
            = comments:leading() node:statement(rulesets, declarations) {
                with_comments(node, comments)
            }

        rule statement(rulesets: bool, declarations: bool) -> Node
            = at:at_rule() { Node::UnknownAtRule(at) }
            / when(rulesets) ruleset:ruleset() { Node::Ruleset(ruleset) }
            / when(declarations) declaration:declaration() { Node::Declaration(declaration) }

        rule block(kind: BlockKind) -> Block
            = open:tok(TokType::LeftBrace, "'{'")
              children:item(kind == BlockKind::Generic, true)*
              leading()
              close:tok(TokType::RightBrace, "'}'")
            {
                // Comments after the last item of a block belong to nobody.
                Block {
                    kind,
                    children,
                    location: between(source, open, close),
                    comments: Vec::new(),
                }
            }

        // ====================================================================
        // Rulesets and selectors
        // ====================================================================

        rule ruleset() -> Ruleset
            = selectors:(selector() ++ (trivia() tok(TokType::Comma, "','") trivia()))
              trivia() block:block(BlockKind::Declarations)
            {
                let location = SourceLocation::merge(&selectors[0].location, &block.location);
                Ruleset {
                    selectors,
                    block,
                    location,
                    comments: Vec::new(),
                }
            }

        /// One selector chain.
        rule selector() -> Selector
            = compound:compound() combinator:combinator()? {
                let mut selector = compound;
                selector.combinator = combinator.map(Box::new);
                selector
            }

        rule compound() -> Selector
            = element:element() refiners:refiner()* {
                compound_selector(source, Some(element), refiners)
            }
            / refiners:refiner()+ { compound_selector(source, None, refiners) }
            / expect("a selector")

        rule element() -> &'input Token
            = is(TokType::Ident) / is_delim('*') / is_delim('&')

        rule refiner() -> Refiner
            = dot:is_delim('.') name:tok(TokType::Ident, "a class name") {
                Refiner::new(RefinerKind::Class, name.value.clone(), between(source, dot, name))
            }
            / hash:is(TokType::Hash) {
                Refiner::new(RefinerKind::Id, hash.value.clone(), token_location(source, hash))
            }
            / pseudo()
            / open:is(TokType::LeftBracket) balanced() close:tok(TokType::RightBracket, "']'") {
                Refiner::new(
                    RefinerKind::Attribute,
                    compact_whitespace(text_between(source, open, close)),
                    between(source, open, close),
                )
            }

        /// `:name`, `::name` or `:name(argument)`.
        rule pseudo() -> Refiner
            = colon:is(TokType::Colon) double:is(TokType::Colon)? target:pseudo_target() {
                let kind = if double.is_some() {
                    RefinerKind::PseudoElement
                } else {
                    RefinerKind::PseudoClass
                };
                let (name, argument, last) = target;
                let mut refiner = Refiner::new(kind, name.value.clone(), between(source, colon, last));
                refiner.argument = argument;
                refiner
            }

        rule pseudo_target() -> (&'input Token, Option<String>, &'input Token)
            = name:is(TokType::Function) balanced() close:tok(TokType::RightParen, "')'") {
                (name, Some(compact_whitespace(text_between(source, name, close))), close)
            }
            / name:tok(TokType::Ident, "a pseudo-class name") { (name, None, name) }

        rule combinator() -> Combinator
            = trivia() symbol:combinator_symbol() trivia() next:selector() {
                let (token, kind) = symbol;
                Combinator {
                    kind,
                    location: SourceLocation::merge(&token_location(source, token), &next.location),
                    selector: next,
                }
            }
            / ws()+ next:selector() {
                Combinator {
                    kind: CombinatorKind::Descendant,
                    location: next.location.clone(),
                    selector: next,
                }
            }

        rule combinator_symbol() -> (&'input Token, CombinatorKind)
            = t:is_delim('>') { (t, CombinatorKind::Child) }
            / t:is_delim('+') { (t, CombinatorKind::AdjacentSibling) }
            / t:is_delim('~') { (t, CombinatorKind::GeneralSibling) }

        // ====================================================================
        // Declarations
        // ====================================================================

        rule declaration() -> Declaration
            = star:is_delim('*')? name:tok(TokType::Ident, "a declaration") trivia()
              tok(TokType::Colon, "':'") trivia()
              values:value_list(ValueMode::Declaration) trivia() &terminator()
            {
                let start = token_location(source, star.unwrap_or(name));
                let location =
                    SourceLocation::merge_all(std::iter::once(&start).chain(values.iter().map(Value::location)));
                let mut declaration = Declaration::new(name.value.clone(), values, location);
                declaration.star_hack = star.is_some();
                declaration
            }

        rule terminator()
            = tok(TokType::Semicolon, "';'") / tok(TokType::RightBrace, "'}'")

        // ====================================================================
        // At-rules
        // ====================================================================

        rule at_rule() -> UnknownAtRule
            = head:at_keyword() trivia() parameters:prelude(head.1) trivia()
              end:at_rule_end(head.1.block_kind())
            {
                let (at, _) = head;
                let (block, semicolon) = end;
                let start = token_location(source, at);
                let finish = match (&block, semicolon) {
                    (Some(block), _) => block.location.clone(),
                    (None, Some(semicolon)) => token_location(source, semicolon),
                    (None, None) => SourceLocation::unknown(),
                };
                let location = SourceLocation::merge_all(
                    std::iter::once(&start)
                        .chain(parameters.iter().map(Value::location))
                        .chain(std::iter::once(&finish)),
                );
                let mut node = UnknownAtRule::new(at.value.clone(), location);
                node.parameters = parameters;
                node.block = block;
                node
            }

        rule at_keyword() -> (&'input Token, AtRuleType)
            = at:is(TokType::AtKeyword) { (at, AtRuleType::from_name(&at.value)) }

        rule prelude(at_type: AtRuleType) -> Vec<Value>
            = when(is_conditional(at_type)) condition:condition() { condition }
            / when(at_type == AtRuleType::Def) values:value_list(ValueMode::Declaration) {
                definition_parameters(values)
            }
            / when(!is_conditional(at_type) && at_type != AtRuleType::Def)
              values:value_list(ValueMode::Prelude) { values }
            / { Vec::new() }

        rule at_rule_end(kind: BlockKind) -> (Option<Block>, Option<&'input Token>)
            = block:block(kind) { (Some(block), None) }
            / semicolon:tok(TokType::Semicolon, "';'") { (None, Some(semicolon)) }
            / &(is(TokType::RightBrace) / is(TokType::EndMarker)) { (None, None) }

        /// The condition of `@if`/`@elseif` as one boolean expression.
        rule condition() -> Vec<Value>
            = first:raw_piece() rest:(trivia() piece:raw_piece() { piece })* {
                let last = rest.last().map_or(first.1, |piece| piece.1);
                let text = normalize_whitespace(&source.text()[first.0.start..last.end]);
                vec![Value::BooleanExpression(BooleanExpression {
                    text: strip_outer_parens(&text).to_string(),
                    location: between(source, first.0, last),
                })]
            }

        /// A token or a bracketed group of tokens, as its first and last token.
        rule raw_piece() -> (&'input Token, &'input Token)
            = open:is(TokType::LeftParen) balanced() close:tok(TokType::RightParen, "')'") {
                (open, close)
            }
            / open:is(TokType::Function) balanced() close:tok(TokType::RightParen, "')'") {
                (open, close)
            }
            / open:is(TokType::LeftBracket) balanced() close:tok(TokType::RightBracket, "']'") {
                (open, close)
            }
            / t:prelude_token() { (t, t) }

        rule prelude_token() -> &'input Token
            = quiet!{ [t] {? if ends_prelude(t) { Err("") } else { Ok(t) } } }

        /// Anything up to the closing token of the enclosing group.
        rule balanced()
            = balanced_piece()*

        rule balanced_piece()
            = is(TokType::LeftParen) balanced() tok(TokType::RightParen, "')'")
            / is(TokType::Function) balanced() tok(TokType::RightParen, "')'")
            / is(TokType::LeftBracket) balanced() tok(TokType::RightBracket, "']'")
            / quiet!{ [t] {? if closes_group(t) { Err("") } else { Ok(()) } } }

        // ====================================================================
        // Values
        // ====================================================================

        /// A whitespace-separated value list. `,` and `/` join their
        /// neighbours into composite values.
        rule value_list(mode: ValueMode) -> Vec<Value>
            = first:term(mode) rest:(trivia() item:list_item(mode) { item })* {
                combine(first, rest)
            }

        rule list_item(mode: ValueMode) -> (Option<CompositeOperator>, Value)
            = operator:operator() trivia() value:term(mode) { (Some(operator), value) }
            / value:term(mode) { (None, value) }

        rule operator() -> CompositeOperator
            = is(TokType::Comma) { CompositeOperator::Comma }
            / is_delim('/') { CompositeOperator::Slash }

        rule term(mode: ValueMode) -> Value
            = priority()
            / progid(mode)
            / function(mode)
            / parenthesized(mode)
            / open:is(TokType::LeftBracket) balanced() close:tok(TokType::RightBracket, "']'") {
                let text = format!("[{}]", normalize_whitespace(text_between(source, open, close)));
                Value::Literal(Literal::new(text, between(source, open, close)))
            }
            / when(mode == ValueMode::Prelude) colon:is(TokType::Colon) name:is(TokType::Ident) {
                Value::Literal(Literal::new(format!(":{}", name.value), between(source, colon, name)))
            }
            / [t] {? simple_value(source, t, mode).ok_or("a value") }

        rule priority() -> Value
            = bang:is_delim('!') trivia() word:keyword("important", "'important'") {
                Value::Priority(Priority { location: between(source, bang, word) })
            }

        /// `progid:DXImageTransform.Microsoft.gradient(...)`, kept as one
        /// function named by everything before the parenthesis.
        rule progid(mode: ValueMode) -> Value
            = start:quiet!{ keyword("progid", "") } is(TokType::Colon)
              parts:(is(TokType::Ident) / is_delim('.'))*
              function:is(TokType::Function) arguments:arguments(mode)
              close:tok(TokType::RightParen, "')'")
            {
                let mut name = format!("{}:", start.value);
                for part in parts {
                    name.push_str(&part.value);
                }
                name.push_str(&function.value);
                Value::Function(FunctionValue {
                    name,
                    arguments,
                    location: between(source, start, close),
                })
            }

        rule function(mode: ValueMode) -> Value
            = function:is(TokType::Function) arguments:arguments(mode)
              close:tok(TokType::RightParen, "')'")
            {
                Value::Function(FunctionValue {
                    name: function.value.clone(),
                    arguments,
                    location: between(source, function, close),
                })
            }

        /// `(ident)` in a prelude becomes a boolean expression and any other
        /// group a literal with its whitespace compacted. In a declaration a
        /// group is a function without a name.
        rule parenthesized(mode: ValueMode) -> Value
            = when(mode == ValueMode::Prelude)
              open:is(TokType::LeftParen) trivia() name:is(TokType::Ident) trivia()
              close:is(TokType::RightParen)
            {
                Value::BooleanExpression(BooleanExpression {
                    text: name.value.clone(),
                    location: between(source, open, close),
                })
            }
            / when(mode == ValueMode::Prelude)
              open:is(TokType::LeftParen) balanced() close:tok(TokType::RightParen, "')'")
            {
                let text = format!("({})", compact_whitespace(text_between(source, open, close)));
                Value::Literal(Literal::new(text, between(source, open, close)))
            }
            / when(mode == ValueMode::Declaration)
              open:is(TokType::LeftParen) arguments:arguments(mode)
              close:tok(TokType::RightParen, "')'")
            {
                Value::Function(FunctionValue {
                    name: String::new(),
                    arguments,
                    location: between(source, open, close),
                })
            }

        /// Function arguments, keeping `,` and `=` separators and a `" "`
        /// literal between space-separated arguments.
        rule arguments(mode: ValueMode) -> Vec<Value>
            = parts:argument(mode)* { join_arguments(parts) }

        rule argument(mode: ValueMode) -> Argument
            = ws()+ { Argument::Space }
            / t:is(TokType::Comma) { Argument::Separator(token_literal(source, t)) }
            / t:is_delim('=') { Argument::Separator(token_literal(source, t)) }
            / t:(is_delim('/') / is_delim('!')) { Argument::Term(token_literal(source, t)) }
            / value:term(mode) { Argument::Term(value) }

        // ====================================================================
        // Tokens
        // ====================================================================

        /// Whitespace and comments inside an item.
        rule trivia()
            = ws()*

        rule ws()
            = quiet!{ [t] {? if t.is_trivia() { Ok(()) } else { Err("") } } }

        /// Whitespace, comments and stray `;` between items. The comments are
        /// kept for the next node.
        rule leading() -> Vec<String>
            = parts:filler()* { parts.into_iter().flatten().collect() }

        rule filler() -> Option<String>
            = quiet!{ [t] {?
                match t.kind {
                    TokType::Whitespace | TokType::Semicolon => Ok(None),
                    TokType::Comment => Ok(Some(t.value.clone())),
                    _ => Err(""),
                }
            } }

        rule when(flag: bool)
            = quiet!{ {? if flag { Ok(()) } else { Err("") } } }

        rule tok(kind: TokType, expected: &'static str) -> &'input Token
            = [t] {? if t.kind == kind { Ok(t) } else { Err(expected) } }

        rule keyword(word: &'static str, expected: &'static str) -> &'input Token
            = [t] {?
                if t.kind == TokType::Ident && t.value.eq_ignore_ascii_case(word) {
                    Ok(t)
                } else {
                    Err(expected)
                }
            }

        rule is(kind: TokType) -> &'input Token
            = quiet!{ [t] {? if t.kind == kind { Ok(t) } else { Err("") } } }

        rule is_delim(c: char) -> &'input Token
            = quiet!{ [t] {? if t.is_delim(c) { Ok(t) } else { Err("") } } }

        rule expect<T>(what: &'static str) -> T
            = [_] {? Err(what) }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn token_location(source: &Arc<SourceCode>, token: &Token) -> SourceLocation {
    SourceLocation::from_offsets(source, token.start, token.end)
}

/// From the start of `first` to the end of `last`.
fn between(source: &Arc<SourceCode>, first: &Token, last: &Token) -> SourceLocation {
    SourceLocation::from_offsets(source, first.start, last.end)
}

/// The source text strictly between two tokens.
fn text_between<'s>(source: &'s SourceCode, open: &Token, close: &Token) -> &'s str {
    &source.text()[open.end..close.start]
}

fn token_literal(source: &Arc<SourceCode>, token: &Token) -> Value {
    Value::Literal(Literal::new(token.value.clone(), token_location(source, token)))
}

fn with_comments(mut node: Node, comments: Vec<String>) -> Node {
    match &mut node {
        Node::Ruleset(n) => n.comments = comments,
        Node::Declaration(n) => n.comments = comments,
        Node::UnknownAtRule(n) => n.comments = comments,
        _ => {}
    }
    node
}

fn compound_selector(
    source: &Arc<SourceCode>,
    element: Option<&Token>,
    refiners: Vec<Refiner>,
) -> Selector {
    let element_location = element.map(|t| token_location(source, t));
    let location = SourceLocation::merge_all(
        element_location
            .iter()
            .chain(refiners.iter().map(|r| &r.location)),
    );
    let mut selector = Selector::new(element.map_or("", |t| t.value.as_str()), location);
    selector.refiners = refiners;
    selector
}

fn is_conditional(at_type: AtRuleType) -> bool {
    matches!(at_type, AtRuleType::If | AtRuleType::ElseIf)
}

/// `@def NAME value`: the name is a literal even though it looks like a
/// constant reference.
fn definition_parameters(mut values: Vec<Value>) -> Vec<Value> {
    if let Some(Value::ConstantReference(name)) = values.first() {
        let literal = Literal::new(name.name.clone(), name.location.clone());
        values[0] = Value::Literal(literal);
    }
    values
}

fn ends_prelude(token: &Token) -> bool {
    token.is_trivia()
        || matches!(
            token.kind,
            TokType::LeftBrace
                | TokType::RightBrace
                | TokType::Semicolon
                | TokType::RightParen
                | TokType::RightBracket
                | TokType::EndMarker
        )
}

fn closes_group(token: &Token) -> bool {
    matches!(
        token.kind,
        TokType::RightParen | TokType::RightBracket | TokType::EndMarker
    )
}

/// A value made of a single token, if the token can be one.
fn simple_value(source: &Arc<SourceCode>, token: &Token, mode: ValueMode) -> Option<Value> {
    let location = token_location(source, token);
    let value = match token.kind {
        TokType::Number => Value::Numeric(Numeric {
            number: token.value[..token.number_len].to_string(),
            unit: token.value[token.number_len..].to_string(),
            location,
        }),
        TokType::String => Value::String(StringValue {
            value: token.value.clone(),
            quote: token.quote,
            location,
        }),
        TokType::Hash => Value::Literal(Literal::new(format!("#{}", token.value), location)),
        TokType::Ident if mode == ValueMode::Declaration && is_constant_name(&token.value) => {
            Value::ConstantReference(ConstantReference {
                name: token.value.clone(),
                location,
            })
        }
        TokType::Url => Value::Function(FunctionValue {
            name: "url".to_string(),
            arguments: vec![Value::Literal(Literal::new(
                token.value.clone(),
                location.clone(),
            ))],
            location,
        }),
        TokType::AtKeyword => Value::Literal(Literal::new(format!("@{}", token.value), location)),
        TokType::Delim if token.is_delim('!') || token.is_delim('/') => return None,
        TokType::Ident | TokType::Colon | TokType::Delim => {
            Value::Literal(Literal::new(token.value.clone(), location))
        }
        _ => return None,
    };
    Some(value)
}

fn combine(first: Value, rest: Vec<(Option<CompositeOperator>, Value)>) -> Vec<Value> {
    let mut values = vec![first];
    for (operator, value) in rest {
        match (operator, values.pop()) {
            (Some(operator), Some(previous)) => {
                values.push(join_composite(previous, operator, value))
            }
            (_, previous) => {
                values.extend(previous);
                values.push(value);
            }
        }
    }
    values
}

fn join_composite(previous: Value, operator: CompositeOperator, next: Value) -> Value {
    match previous {
        Value::Composite(mut composite) if composite.operator == operator => {
            composite.location = SourceLocation::merge(&composite.location, next.location());
            composite.values.push(next);
            Value::Composite(composite)
        }
        previous => {
            let location = SourceLocation::merge(previous.location(), next.location());
            Value::Composite(CompositeValue {
                operator,
                values: vec![previous, next],
                location,
            })
        }
    }
}

fn join_arguments(parts: Vec<Argument>) -> Vec<Value> {
    let mut arguments: Vec<Value> = Vec::new();
    let mut saw_space = false;
    for part in parts {
        match part {
            Argument::Space => saw_space = true,
            Argument::Separator(value) => {
                arguments.push(value);
                saw_space = false;
            }
            Argument::Term(value) => {
                let needs_space = saw_space
                    && arguments
                        .last()
                        .is_some_and(|last| !last.is_argument_separator());
                if needs_space {
                    arguments.push(Value::Literal(Literal::new(" ", SourceLocation::unknown())));
                }
                arguments.push(value);
                saw_space = false;
            }
        }
    }
    arguments
}

/// Collapse whitespace runs to one space and trim.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`normalize_whitespace`], and also drop the spaces next to
/// `:`, `,`, `(` and `)`.
fn compact_whitespace(text: &str) -> String {
    let normalized = normalize_whitespace(text);
    let mut out = String::with_capacity(normalized.len());
    let chars: Vec<char> = normalized.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let before = i.checked_sub(1).map(|j| chars[j]);
            let after = chars.get(i + 1).copied();
            let tight = |c: Option<char>| matches!(c, Some(':' | ',' | '(' | ')'));
            if tight(after) || matches!(before, Some(':' | ',' | '(')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// `(a && b)` becomes `a && b`; `(a) && (b)` is left alone.
fn strip_outer_parens(text: &str) -> &str {
    let inner = match text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => inner,
        None => return text,
    };
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return text;
                }
            }
            _ => {}
        }
    }
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_helpers() {
        assert_eq!(normalize_whitespace("  a \n b  "), "a b");
        assert_eq!(compact_whitespace(" max-width : 10px "), "max-width:10px");
        assert_eq!(compact_whitespace("a , b ( c )"), "a,b(c)");
    }

    #[test]
    fn outer_parens() {
        assert_eq!(strip_outer_parens("(a && b)"), "a && b");
        assert_eq!(strip_outer_parens("(a) && (b)"), "(a) && (b)");
        assert_eq!(strip_outer_parens("a"), "a");
    }

    #[test]
    fn end_marker_sits_at_the_end_of_the_text() {
        let tokens = TokVec::new(Vec::new(), 7);
        let marker = tokens.get(0).expect("end marker");
        assert_eq!(marker.kind, TokType::EndMarker);
        assert_eq!((marker.start, marker.end), (7, 7));
        assert!(tokens.is_eof(1));
        assert_eq!(tokens.position_repr(1), 0);
    }
}
