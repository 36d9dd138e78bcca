// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! At-rules: the raw form produced by the parser and the typed forms the
//! classification passes replace it with.

use gss_core::SourceLocation;

use super::tree::{Block, BlockKind};
use super::values::{Literal, Value};

// ============================================================================
// At-rule catalog
// ============================================================================

/// Margin boxes allowed inside `@page`.
pub const PAGE_MARGIN_BOXES: [&str; 16] = [
    "top-left-corner",
    "top-left",
    "top-center",
    "top-right",
    "top-right-corner",
    "bottom-left-corner",
    "bottom-left",
    "bottom-center",
    "bottom-right",
    "bottom-right-corner",
    "left-top",
    "left-middle",
    "left-bottom",
    "right-top",
    "right-middle",
    "right-bottom",
];

/// The kind of an at-rule, decided by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtRuleType {
    Charset,
    Import,
    Media,
    Page,
    PageMarginBox,
    FontFace,
    Def,
    If,
    ElseIf,
    Else,
    For,
    Keyframes,
    Supports,
    /// Any name this compiler has no knowledge of.
    Unknown,
}

impl AtRuleType {
    /// Classify an at-rule name, without the leading `@`. Matching is
    /// case-insensitive.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "charset" => AtRuleType::Charset,
            "import" => AtRuleType::Import,
            "media" => AtRuleType::Media,
            "page" => AtRuleType::Page,
            "font-face" => AtRuleType::FontFace,
            "def" => AtRuleType::Def,
            "if" => AtRuleType::If,
            "elseif" => AtRuleType::ElseIf,
            "else" => AtRuleType::Else,
            "for" => AtRuleType::For,
            "keyframes" | "-webkit-keyframes" | "-moz-keyframes" | "-o-keyframes" => {
                AtRuleType::Keyframes
            }
            "supports" => AtRuleType::Supports,
            other if PAGE_MARGIN_BOXES.contains(&other) => AtRuleType::PageMarginBox,
            _ => AtRuleType::Unknown,
        }
    }

    /// True for `@if`, `@elseif` and `@else`.
    pub fn is_conditional(self) -> bool {
        matches!(self, AtRuleType::If | AtRuleType::ElseIf | AtRuleType::Else)
    }

    /// Whether a well-formed rule of this kind ends with a block rather
    /// than a semicolon.
    pub fn expects_block(self) -> bool {
        !matches!(
            self,
            AtRuleType::Charset | AtRuleType::Import | AtRuleType::Def
        )
    }

    /// The kind of block the parser creates for a rule of this kind.
    pub fn block_kind(self) -> BlockKind {
        match self {
            AtRuleType::Page | AtRuleType::PageMarginBox | AtRuleType::FontFace => {
                BlockKind::Declarations
            }
            _ => BlockKind::Generic,
        }
    }

    /// True for at-rules the compiler knows, as opposed to ones it passes
    /// through untouched.
    pub fn is_recognized(self) -> bool {
        self != AtRuleType::Unknown
    }
}

// ============================================================================
// Raw at-rule
// ============================================================================

/// An at-rule as written: `@name params;` or `@name params { ... }`.
///
/// Every at-rule starts in this form. Classification passes replace the
/// ones they recognize with typed nodes; the rest are printed as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownAtRule {
    /// The name without the leading `@`, as written.
    pub name: String,
    pub at_type: AtRuleType,
    pub parameters: Vec<Value>,
    pub block: Option<Block>,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

impl UnknownAtRule {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        let name = name.into();
        UnknownAtRule {
            at_type: AtRuleType::from_name(&name),
            name,
            parameters: Vec::new(),
            block: None,
            location,
            comments: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<Value>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }
}

// ============================================================================
// Typed at-rules
// ============================================================================

/// `@charset "utf-8";`
#[derive(Debug, Clone, PartialEq)]
pub struct CharSet {
    pub parameters: Vec<Value>,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

/// `@import url(a.css) screen;`
///
/// An import that follows other rules is kept in place but marked
/// `ignored`; browsers do not apply it and the printers drop it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRule {
    pub parameters: Vec<Value>,
    pub ignored: bool,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

/// `@media screen and (color) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRule {
    pub name: String,
    pub parameters: Vec<Value>,
    pub block: Block,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

/// `@page :first { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct PageRule {
    pub name: String,
    pub parameters: Vec<Value>,
    pub block: Block,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

/// A page margin box such as `@top-left { ... }` inside `@page`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSelector {
    pub name: String,
    pub block: Block,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

/// `@font-face { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub name: String,
    pub block: Block,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

/// `@def NAME value...;`
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: Literal,
    pub values: Vec<Value>,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

// ============================================================================
// Conditionals
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionalKind {
    If,
    ElseIf,
    Else,
}

impl ConditionalKind {
    pub fn name(self) -> &'static str {
        match self {
            ConditionalKind::If => "if",
            ConditionalKind::ElseIf => "elseif",
            ConditionalKind::Else => "else",
        }
    }
}

/// One arm of a conditional chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalRule {
    pub kind: ConditionalKind,
    /// The condition; a single boolean expression for `@if`/`@elseif` and
    /// empty for `@else` in well-formed input.
    pub parameters: Vec<Value>,
    pub block: Block,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

impl ConditionalRule {
    pub fn condition(&self) -> Option<&Value> {
        self.parameters.first()
    }
}

/// An `@if` followed by any number of `@elseif` and at most one `@else`.
///
/// The first rule is always an `@if` and only the last may be an `@else`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBlock {
    pub rules: Vec<ConditionalRule>,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

impl ConditionalBlock {
    pub fn new(comments: Vec<String>) -> Self {
        ConditionalBlock {
            rules: Vec::new(),
            location: SourceLocation::unknown(),
            comments,
        }
    }

    /// Append a rule and widen the location to cover it.
    pub fn push_rule(&mut self, rule: ConditionalRule) {
        self.rules.push(rule);
        self.location = SourceLocation::merge_all(self.rules.iter().map(|r| &r.location));
    }

    /// True once an `@else` closed the chain.
    pub fn is_closed(&self) -> bool {
        self.rules
            .last()
            .is_some_and(|rule| rule.kind == ConditionalKind::Else)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_classifies_names() {
        assert_eq!(AtRuleType::from_name("media"), AtRuleType::Media);
        assert_eq!(AtRuleType::from_name("MEDIA"), AtRuleType::Media);
        assert_eq!(AtRuleType::from_name("top-left"), AtRuleType::PageMarginBox);
        assert_eq!(AtRuleType::from_name("elseif"), AtRuleType::ElseIf);
        assert_eq!(AtRuleType::from_name("-webkit-keyframes"), AtRuleType::Keyframes);
        assert_eq!(AtRuleType::from_name("custom"), AtRuleType::Unknown);
    }

    #[test]
    fn block_kinds() {
        assert_eq!(AtRuleType::Page.block_kind(), BlockKind::Declarations);
        assert_eq!(AtRuleType::FontFace.block_kind(), BlockKind::Declarations);
        assert_eq!(AtRuleType::Media.block_kind(), BlockKind::Generic);
        assert!(!AtRuleType::Def.expects_block());
        assert!(AtRuleType::If.expects_block());
    }

    #[test]
    fn margin_box_catalog_is_complete() {
        assert_eq!(PAGE_MARGIN_BOXES.len(), 16);
        for name in PAGE_MARGIN_BOXES {
            assert_eq!(AtRuleType::from_name(name).block_kind(), BlockKind::Declarations);
        }
    }

    #[test]
    fn conditional_block_tracks_else() {
        let rule = |kind| ConditionalRule {
            kind,
            parameters: Vec::new(),
            block: Block::new(BlockKind::Generic),
            location: SourceLocation::unknown(),
            comments: Vec::new(),
        };
        let mut block = ConditionalBlock::new(Vec::new());
        block.push_rule(rule(ConditionalKind::If));
        assert!(!block.is_closed());
        block.push_rule(rule(ConditionalKind::Else));
        assert!(block.is_closed());
        assert_eq!(block.rules.len(), 2);
    }
}
