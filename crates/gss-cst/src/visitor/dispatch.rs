// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for read-only traversal.
//!
//! - **Pre-order**: `enter_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Document order**: children are visited in the order they were written
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_*`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave_*` called)

use super::control::VisitControl;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{
    Block, BlockKind, CharSet, Combinator, ConditionalBlock, ConditionalRule, CssTree,
    Declaration, Definition, FontFace, ImportRule, MediaRule, Node, NodeKind, PageRule,
    PageSelector, Refiner, Ruleset, Selector, UnknownAtRule, Value,
};

/// Drives a read-only [`Visitor`] over a whole tree.
#[derive(Debug, Clone, Copy)]
pub struct VisitController<'t> {
    tree: &'t CssTree,
}

impl<'t> VisitController<'t> {
    pub fn new(tree: &'t CssTree) -> Self {
        VisitController { tree }
    }

    /// Visit every node of the tree, starting with the root.
    pub fn start_visit<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        let mut ctl = VisitControl::new();
        walk_tree(visitor, self.tree, &mut ctl)
    }
}

/// Translate the result of an `enter_*` hook, folding `stop_visit` into it.
fn entered(result: VisitResult, ctl: &mut VisitControl) -> VisitResult {
    if result == VisitResult::Stop {
        ctl.stop_visit();
    }
    if ctl.is_stopped() {
        VisitResult::Stop
    } else {
        result
    }
}

/// The result of a walk once `leave_*` has run.
fn left(ctl: &VisitControl) -> VisitResult {
    if ctl.is_stopped() {
        VisitResult::Stop
    } else {
        VisitResult::Continue
    }
}

/// Walk children with `kind` recorded as the enclosing node.
fn descend(
    ctl: &mut VisitControl,
    kind: NodeKind,
    children: impl FnOnce(&mut VisitControl) -> VisitResult,
) -> VisitResult {
    ctl.push(kind);
    let result = children(ctl);
    ctl.pop();
    result
}

// ============================================================================
// Structure
// ============================================================================

/// Walk a [`CssTree`]: charset, imports, then body.
pub fn walk_tree<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &CssTree,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_tree(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Tree, |ctl| {
                if let Some(charset) = &node.charset {
                    if walk_charset(visitor, charset, ctl) == VisitResult::Stop {
                        return VisitResult::Stop;
                    }
                }
                for import in &node.imports {
                    if walk_import_rule(visitor, import, ctl) == VisitResult::Stop {
                        return VisitResult::Stop;
                    }
                }
                walk_block(visitor, &node.body, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_tree(node, ctl);
    left(ctl)
}

/// Walk a [`Block`], dispatching on its kind to `enter_block` or
/// `enter_declaration_block`.
pub fn walk_block<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Block,
    ctl: &mut VisitControl,
) -> VisitResult {
    let (enter, kind) = match node.kind {
        BlockKind::Generic => (visitor.enter_block(node, ctl), NodeKind::Block),
        BlockKind::Declarations => (
            visitor.enter_declaration_block(node, ctl),
            NodeKind::DeclarationBlock,
        ),
    };
    match entered(enter, ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, kind, |ctl| walk_nodes(visitor, &node.children, ctl));
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    match node.kind {
        BlockKind::Generic => visitor.leave_block(node, ctl),
        BlockKind::Declarations => visitor.leave_declaration_block(node, ctl),
    }
    left(ctl)
}

fn walk_nodes<V: Visitor + ?Sized>(
    visitor: &mut V,
    nodes: &[Node],
    ctl: &mut VisitControl,
) -> VisitResult {
    for node in nodes {
        if walk_node(visitor, node, ctl) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Walk any block child.
pub fn walk_node<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Node,
    ctl: &mut VisitControl,
) -> VisitResult {
    match node {
        Node::Ruleset(n) => walk_ruleset(visitor, n, ctl),
        Node::Declaration(n) => walk_declaration(visitor, n, ctl),
        Node::UnknownAtRule(n) => walk_unknown_at_rule(visitor, n, ctl),
        Node::Media(n) => walk_media_rule(visitor, n, ctl),
        Node::Page(n) => walk_page_rule(visitor, n, ctl),
        Node::PageSelector(n) => walk_page_selector(visitor, n, ctl),
        Node::FontFace(n) => walk_font_face(visitor, n, ctl),
        Node::CharSet(n) => walk_charset(visitor, n, ctl),
        Node::Import(n) => walk_import_rule(visitor, n, ctl),
        Node::Definition(n) => walk_definition(visitor, n, ctl),
        Node::ConditionalBlock(n) => walk_conditional_block(visitor, n, ctl),
    }
}

/// Walk a [`Ruleset`]: selectors, then the declaration block.
pub fn walk_ruleset<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Ruleset,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_ruleset(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Ruleset, |ctl| {
                for selector in &node.selectors {
                    if walk_selector(visitor, selector, ctl) == VisitResult::Stop {
                        return VisitResult::Stop;
                    }
                }
                walk_block(visitor, &node.block, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_ruleset(node, ctl);
    left(ctl)
}

/// Walk a [`Selector`]: refiners, then the combinator chain.
pub fn walk_selector<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Selector,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_selector(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Selector, |ctl| {
                for refiner in &node.refiners {
                    if walk_refiner(visitor, refiner, ctl) == VisitResult::Stop {
                        return VisitResult::Stop;
                    }
                }
                match &node.combinator {
                    Some(combinator) => walk_combinator(visitor, combinator, ctl),
                    None => VisitResult::Continue,
                }
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_selector(node, ctl);
    left(ctl)
}

pub fn walk_refiner<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Refiner,
    ctl: &mut VisitControl,
) -> VisitResult {
    if entered(visitor.enter_refiner(node, ctl), ctl) == VisitResult::Stop {
        return VisitResult::Stop;
    }
    visitor.leave_refiner(node, ctl);
    left(ctl)
}

pub fn walk_combinator<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Combinator,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_combinator(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Combinator, |ctl| {
                walk_selector(visitor, &node.selector, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_combinator(node, ctl);
    left(ctl)
}

pub fn walk_declaration<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Declaration,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_declaration(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Declaration, |ctl| {
                walk_values(visitor, &node.values, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_declaration(node, ctl);
    left(ctl)
}

// ============================================================================
// At-rules
// ============================================================================

/// Walk an [`UnknownAtRule`]: parameters, then the block if any.
pub fn walk_unknown_at_rule<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &UnknownAtRule,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_unknown_at_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::UnknownAtRule, |ctl| {
                walk_values(visitor, &node.parameters, ctl).and_then(|| match &node.block {
                    Some(block) => walk_block(visitor, block, ctl),
                    None => VisitResult::Continue,
                })
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_unknown_at_rule(node, ctl);
    left(ctl)
}

pub fn walk_media_rule<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &MediaRule,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_media_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Media, |ctl| {
                walk_values(visitor, &node.parameters, ctl)
                    .and_then(|| walk_block(visitor, &node.block, ctl))
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_media_rule(node, ctl);
    left(ctl)
}

pub fn walk_page_rule<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &PageRule,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_page_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Page, |ctl| {
                walk_values(visitor, &node.parameters, ctl)
                    .and_then(|| walk_block(visitor, &node.block, ctl))
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_page_rule(node, ctl);
    left(ctl)
}

pub fn walk_page_selector<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &PageSelector,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_page_selector(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::PageSelector, |ctl| {
                walk_block(visitor, &node.block, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_page_selector(node, ctl);
    left(ctl)
}

pub fn walk_font_face<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &FontFace,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_font_face(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::FontFace, |ctl| {
                walk_block(visitor, &node.block, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_font_face(node, ctl);
    left(ctl)
}

pub fn walk_charset<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &CharSet,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_charset(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::CharSet, |ctl| {
                walk_values(visitor, &node.parameters, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_charset(node, ctl);
    left(ctl)
}

pub fn walk_import_rule<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &ImportRule,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_import_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Import, |ctl| {
                walk_values(visitor, &node.parameters, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_import_rule(node, ctl);
    left(ctl)
}

pub fn walk_definition<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Definition,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_definition(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Definition, |ctl| {
                walk_values(visitor, &node.values, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_definition(node, ctl);
    left(ctl)
}

pub fn walk_conditional_block<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &ConditionalBlock,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_conditional_block(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::ConditionalBlock, |ctl| {
                for rule in &node.rules {
                    if walk_conditional_rule(visitor, rule, ctl) == VisitResult::Stop {
                        return VisitResult::Stop;
                    }
                }
                VisitResult::Continue
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_conditional_block(node, ctl);
    left(ctl)
}

pub fn walk_conditional_rule<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &ConditionalRule,
    ctl: &mut VisitControl,
) -> VisitResult {
    match entered(visitor.enter_conditional_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::ConditionalRule, |ctl| {
                walk_values(visitor, &node.parameters, ctl)
                    .and_then(|| walk_block(visitor, &node.block, ctl))
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_conditional_rule(node, ctl);
    left(ctl)
}

// ============================================================================
// Values
// ============================================================================

fn walk_values<V: Visitor + ?Sized>(
    visitor: &mut V,
    values: &[Value],
    ctl: &mut VisitControl,
) -> VisitResult {
    for value in values {
        if walk_value(visitor, value, ctl) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Walk a [`Value`]. Composite parts and function arguments are children.
pub fn walk_value<V: Visitor + ?Sized>(
    visitor: &mut V,
    node: &Value,
    ctl: &mut VisitControl,
) -> VisitResult {
    let enter = match node {
        Value::Literal(v) => visitor.enter_literal(v, ctl),
        Value::String(v) => visitor.enter_string(v, ctl),
        Value::Numeric(v) => visitor.enter_numeric(v, ctl),
        Value::Composite(v) => visitor.enter_composite(v, ctl),
        Value::Function(v) => visitor.enter_function(v, ctl),
        Value::Priority(v) => visitor.enter_priority(v, ctl),
        Value::BooleanExpression(v) => visitor.enter_boolean_expression(v, ctl),
        Value::ConstantReference(v) => visitor.enter_constant_reference(v, ctl),
    };
    match entered(enter, ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let children = match node {
                Value::Composite(v) => Some(&v.values),
                Value::Function(v) => Some(&v.arguments),
                _ => None,
            };
            if let Some(children) = children {
                let result = descend(ctl, NodeKind::Value, |ctl| {
                    walk_values(visitor, children, ctl)
                });
                if result == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
    }
    match node {
        Value::Literal(v) => visitor.leave_literal(v, ctl),
        Value::String(v) => visitor.leave_string(v, ctl),
        Value::Numeric(v) => visitor.leave_numeric(v, ctl),
        Value::Composite(v) => visitor.leave_composite(v, ctl),
        Value::Function(v) => visitor.leave_function(v, ctl),
        Value::Priority(v) => visitor.leave_priority(v, ctl),
        Value::BooleanExpression(v) => visitor.leave_boolean_expression(v, ctl),
        Value::ConstantReference(v) => visitor.leave_constant_reference(v, ctl),
    }
    left(ctl)
}
