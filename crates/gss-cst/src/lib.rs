// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A GSS stylesheet tree with its parser, passes and printers.
//!
//! GSS is a superset of CSS with compile-time constants (`@def`),
//! conditionals (`@if`/`@elseif`/`@else`) and class renaming.
//!
//! # Overview
//!
//! - **Parsing**: turn source text into a [`CssTree`] with [`parse_stylesheet`]
//!   or [`parse_str`]. At-rules come out as [`UnknownAtRule`] nodes.
//! - **Traversal**: read the tree with a [`Visitor`], or edit it in place with
//!   a [`MutatingVisitor`] that may remove and replace nodes while walking.
//! - **Passes**: classify at-rules into typed nodes, group conditionals,
//!   evaluate them, inline constants and rename classes. See [`passes`].
//! - **Printing**: [`CompactPrinter`] for minified output and
//!   [`PrettyPrinter`] for indented output.
//!
//! # Quick Start
//!
//! ```
//! use gss_core::BasicErrorManager;
//! use gss_cst::{parse_str, passes, CompactPrinter, CssCompilerPass};
//!
//! let mut tree = parse_str("a.gss", ".a { color: red; }\n.b { color: blue; }").expect("parse error");
//! let mut errors = BasicErrorManager::new();
//! passes::CreateStandardAtRuleNodes::new(&mut errors).run_pass(&mut tree);
//! assert_eq!(CompactPrinter::print(&tree), ".a{color:red}.b{color:blue}");
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Stylesheet tree node types.
pub mod nodes;
pub use nodes::{
    AtRuleType, Block, BlockKind, ConditionalBlock, ConditionalKind, ConditionalRule, CssTree,
    Declaration, Definition, Node, NodeKind, Ruleset, Selector, UnknownAtRule, Value,
};

/// Tokenizer for GSS source text.
pub mod tokenizer;

/// Parser producing trees from source text.
pub mod parser;
pub use parser::{parse_stylesheet, parse_str, ParserError};

/// Read-only and mutating traversal.
pub mod visitor;
pub use visitor::{
    MutatingVisitController, MutatingVisitor, MutationControl, VisitControl, VisitController,
    VisitResult, Visitor,
};

/// Compiler passes over the tree.
pub mod passes;
pub use passes::CssCompilerPass;

/// Printers turning a tree back into CSS.
pub mod printer;
pub use printer::{CompactPrinter, PrettyPrinter};
