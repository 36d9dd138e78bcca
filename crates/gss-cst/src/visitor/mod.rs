// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for stylesheet trees.
//!
//! - [`Visitor`]: read-only traversal, driven by [`VisitController`]
//! - [`MutatingVisitor`]: in-place traversal that may remove or replace the
//!   current node, driven by [`MutatingVisitController`]
//!
//! Both traits have an `enter_*`/`leave_*` hook pair for every node type. The
//! second argument of every hook is the traversal control, used to stop the
//! visit, ask about enclosing nodes and, for the mutating walk, request
//! structural edits.
//!
//! # Example
//!
//! ```ignore
//! use gss_cst::visitor::{MutatingVisitController, MutatingVisitor, MutationControl, VisitResult};
//! use gss_cst::nodes::Declaration;
//!
//! struct DropColor;
//!
//! impl MutatingVisitor for DropColor {
//!     fn enter_declaration(&mut self, node: &mut Declaration, ctl: &mut MutationControl) -> VisitResult {
//!         if node.property == "color" {
//!             ctl.remove_current_node();
//!         }
//!         VisitResult::Continue
//!     }
//! }
//!
//! MutatingVisitController::new(&mut tree).start_visit(&mut DropColor);
//! ```

mod control;
mod dispatch;
mod mutating;
mod traits;

pub use control::{MutationControl, VisitControl};
pub use dispatch::{
    walk_block, walk_charset, walk_combinator, walk_conditional_block, walk_conditional_rule,
    walk_declaration, walk_definition, walk_font_face, walk_import_rule, walk_media_rule,
    walk_node, walk_page_rule, walk_page_selector, walk_refiner, walk_ruleset, walk_selector,
    walk_tree, walk_unknown_at_rule, walk_value, VisitController,
};
pub use mutating::{
    walk_block_mut, walk_node_mut, walk_tree_mut, walk_value_mut, MutatingVisitController,
};
pub use traits::{MutatingVisitor, VisitResult, Visitor};
