// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The stylesheet root, blocks and the block-child enum.

use std::fmt;

use gss_core::SourceLocation;

use super::at_rules::{
    CharSet, ConditionalBlock, Definition, FontFace, ImportRule, MediaRule, PageRule,
    PageSelector, UnknownAtRule,
};
use super::rules::{Declaration, Ruleset};

/// A parsed stylesheet.
///
/// The body holds every rule in document order. `@charset` and accepted
/// `@import` rules are moved out of the body into their own slots by the
/// standard at-rule pass, and are printed before it.
#[derive(Debug, Clone, PartialEq)]
pub struct CssTree {
    pub charset: Option<CharSet>,
    pub imports: Vec<ImportRule>,
    pub body: Block,
    pub location: SourceLocation,
}

impl CssTree {
    pub fn new(body: Block, location: SourceLocation) -> Self {
        CssTree {
            charset: None,
            imports: Vec::new(),
            body,
            location,
        }
    }

    /// An empty stylesheet.
    pub fn empty() -> Self {
        CssTree::new(Block::new(BlockKind::Generic), SourceLocation::unknown())
    }

    /// Append the rules of `other` to this tree, as if its text followed
    /// this tree's text.
    pub fn append(&mut self, other: CssTree) {
        if self.charset.is_none() {
            self.charset = other.charset;
        }
        self.imports.extend(other.imports);
        self.body.children.extend(other.body.children);
        self.location = SourceLocation::merge(&self.location, &other.location);
    }

    pub fn deep_copy(&self) -> CssTree {
        self.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// Holds rulesets and at-rules.
    #[default]
    Generic,
    /// Holds declarations, plus page margin boxes and conditionals.
    Declarations,
}

/// An ordered list of block children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub kind: BlockKind,
    pub children: Vec<Node>,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Block {
            kind,
            ..Block::default()
        }
    }

    pub fn with_children(kind: BlockKind, children: Vec<Node>) -> Self {
        Block {
            kind,
            children,
            ..Block::default()
        }
    }

    pub fn is_declaration_block(&self) -> bool {
        self.kind == BlockKind::Declarations
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Anything that can appear as a child of a [`Block`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Ruleset(Ruleset),
    Declaration(Declaration),
    UnknownAtRule(UnknownAtRule),
    Media(MediaRule),
    Page(PageRule),
    PageSelector(PageSelector),
    FontFace(FontFace),
    CharSet(CharSet),
    Import(ImportRule),
    Definition(Definition),
    ConditionalBlock(ConditionalBlock),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Ruleset(_) => NodeKind::Ruleset,
            Node::Declaration(_) => NodeKind::Declaration,
            Node::UnknownAtRule(_) => NodeKind::UnknownAtRule,
            Node::Media(_) => NodeKind::Media,
            Node::Page(_) => NodeKind::Page,
            Node::PageSelector(_) => NodeKind::PageSelector,
            Node::FontFace(_) => NodeKind::FontFace,
            Node::CharSet(_) => NodeKind::CharSet,
            Node::Import(_) => NodeKind::Import,
            Node::Definition(_) => NodeKind::Definition,
            Node::ConditionalBlock(_) => NodeKind::ConditionalBlock,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Node::Ruleset(n) => &n.location,
            Node::Declaration(n) => &n.location,
            Node::UnknownAtRule(n) => &n.location,
            Node::Media(n) => &n.location,
            Node::Page(n) => &n.location,
            Node::PageSelector(n) => &n.location,
            Node::FontFace(n) => &n.location,
            Node::CharSet(n) => &n.location,
            Node::Import(n) => &n.location,
            Node::Definition(n) => &n.location,
            Node::ConditionalBlock(n) => &n.location,
        }
    }

    /// Comments written directly before this node.
    pub fn comments(&self) -> &[String] {
        match self {
            Node::Ruleset(n) => &n.comments,
            Node::Declaration(n) => &n.comments,
            Node::UnknownAtRule(n) => &n.comments,
            Node::Media(n) => &n.comments,
            Node::Page(n) => &n.comments,
            Node::PageSelector(n) => &n.comments,
            Node::FontFace(n) => &n.comments,
            Node::CharSet(n) => &n.comments,
            Node::Import(n) => &n.comments,
            Node::Definition(n) => &n.comments,
            Node::ConditionalBlock(n) => &n.comments,
        }
    }

    pub fn deep_copy(&self) -> Node {
        self.clone()
    }
}

/// The kind of every node the visitors walk, including the ones that are not
/// block children. Used for ancestor queries during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Tree,
    Block,
    DeclarationBlock,
    Ruleset,
    Selector,
    Refiner,
    Combinator,
    Declaration,
    UnknownAtRule,
    Media,
    Page,
    PageSelector,
    FontFace,
    CharSet,
    Import,
    Definition,
    ConditionalBlock,
    ConditionalRule,
    Value,
}

impl NodeKind {
    /// True for the at-rule kinds, raw or typed.
    pub fn is_at_rule(self) -> bool {
        matches!(
            self,
            NodeKind::UnknownAtRule
                | NodeKind::Media
                | NodeKind::Page
                | NodeKind::PageSelector
                | NodeKind::FontFace
                | NodeKind::CharSet
                | NodeKind::Import
                | NodeKind::Definition
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Tree => "stylesheet",
            NodeKind::Block => "block",
            NodeKind::DeclarationBlock => "declaration block",
            NodeKind::Ruleset => "ruleset",
            NodeKind::Selector => "selector",
            NodeKind::Refiner => "refiner",
            NodeKind::Combinator => "combinator",
            NodeKind::Declaration => "declaration",
            NodeKind::UnknownAtRule => "at-rule",
            NodeKind::Media => "@media",
            NodeKind::Page => "@page",
            NodeKind::PageSelector => "page margin box",
            NodeKind::FontFace => "@font-face",
            NodeKind::CharSet => "@charset",
            NodeKind::Import => "@import",
            NodeKind::Definition => "@def",
            NodeKind::ConditionalBlock => "conditional block",
            NodeKind::ConditionalRule => "conditional rule",
            NodeKind::Value => "value",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Value;

    fn declaration(property: &str) -> Node {
        Node::Declaration(Declaration::new(
            property,
            vec![Value::literal("red")],
            SourceLocation::unknown(),
        ))
    }

    #[test]
    fn append_concatenates_bodies() {
        let mut first = CssTree::new(
            Block::with_children(BlockKind::Generic, vec![declaration("a")]),
            SourceLocation::unknown(),
        );
        let second = CssTree::new(
            Block::with_children(BlockKind::Generic, vec![declaration("b")]),
            SourceLocation::unknown(),
        );
        first.append(second);
        assert_eq!(first.body.len(), 2);
        assert_eq!(first.body.children[1], declaration("b"));
    }

    #[test]
    fn deep_copy_is_independent() {
        let tree = CssTree::new(
            Block::with_children(BlockKind::Generic, vec![declaration("a")]),
            SourceLocation::unknown(),
        );
        let mut copy = tree.deep_copy();
        copy.body.children.clear();
        assert_eq!(tree.body.len(), 1);
        assert!(copy.body.is_empty());
    }

    #[test]
    fn node_kinds() {
        assert_eq!(declaration("a").kind(), NodeKind::Declaration);
        assert!(NodeKind::Media.is_at_rule());
        assert!(!NodeKind::Ruleset.is_at_rule());
        assert_eq!(NodeKind::Page.to_string(), "@page");
    }
}
