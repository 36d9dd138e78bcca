// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for mutating traversal.
//!
//! The order of hooks is the same as for the read-only walk. In addition,
//! every list the walker iterates (block children, values, selectors, ...)
//! is iterated with an explicit index cursor so that hooks can remove or
//! replace the current element through [`MutationControl`]:
//!
//! - the edit is applied once the current element's hooks have returned
//! - after a removal the cursor stays put, so the next sibling is visited next
//! - after a replacement the cursor either stays put (the replacements are
//!   visited) or moves past the replacements (they are not)
//! - an edit requested in `enter_*` skips the element's children and `leave_*`
//!
//! Visiting an empty list, or emptying a list while iterating it, is fine.

use super::control::{Edit, MutationControl, Slot};
use super::traits::{MutatingVisitor, VisitResult};
use crate::nodes::{
    Block, BlockKind, CharSet, Combinator, ConditionalBlock, ConditionalRule, CssTree,
    Declaration, Definition, FontFace, ImportRule, MediaRule, Node, NodeKind, PageRule,
    PageSelector, Refiner, Ruleset, Selector, UnknownAtRule, Value,
};

/// Drives a [`MutatingVisitor`] over a whole tree.
#[derive(Debug)]
pub struct MutatingVisitController<'t> {
    tree: &'t mut CssTree,
}

impl<'t> MutatingVisitController<'t> {
    pub fn new(tree: &'t mut CssTree) -> Self {
        MutatingVisitController { tree }
    }

    /// Visit every node of the tree, applying the edits the visitor requests.
    pub fn start_visit<V: MutatingVisitor + ?Sized>(&mut self, visitor: &mut V) -> VisitResult {
        let mut ctl = MutationControl::new();
        walk_tree_mut(visitor, self.tree, &mut ctl)
    }
}

fn entered(result: VisitResult, ctl: &mut MutationControl) -> VisitResult {
    if result == VisitResult::Stop {
        ctl.stop_visit();
    }
    if ctl.is_stopped() {
        VisitResult::Stop
    } else {
        result
    }
}

fn left(ctl: &MutationControl) -> VisitResult {
    if ctl.is_stopped() {
        VisitResult::Stop
    } else {
        VisitResult::Continue
    }
}

/// Walk children with `kind` recorded as the enclosing node. Single-valued
/// children visited directly inside `children` sit in a fixed slot.
fn descend(
    ctl: &mut MutationControl,
    kind: NodeKind,
    children: impl FnOnce(&mut MutationControl) -> VisitResult,
) -> VisitResult {
    ctl.push(kind);
    ctl.push_slot(Slot::Fixed);
    let result = children(ctl);
    ctl.pop_slot();
    ctl.pop();
    result
}

// ============================================================================
// Lists
// ============================================================================

fn walk_nodes_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    nodes: &mut Vec<Node>,
    ctl: &mut MutationControl,
) -> VisitResult {
    let mut index = 0;
    while index < nodes.len() {
        ctl.push_slot(Slot::BlockChild);
        let result = walk_node_mut(visitor, &mut nodes[index], ctl);
        ctl.pop_slot();

        if let Some(update) = ctl.take_sibling_edit() {
            match index.checked_sub(1).and_then(|i| nodes.get_mut(i)) {
                Some(previous) => update(previous),
                None => panic!("the current node has no previous sibling to update"),
            }
        }

        index = match ctl.take_edit() {
            None => index + 1,
            Some(Edit::Remove) => {
                nodes.remove(index);
                index
            }
            Some(Edit::ReplaceNodes {
                nodes: replacements,
                visit,
            }) => {
                let count = replacements.len();
                nodes.splice(index..=index, replacements);
                if visit {
                    index
                } else {
                    index + count
                }
            }
            Some(Edit::ReplaceValues { .. }) => {
                panic!("a block child cannot be replaced with values")
            }
        };

        if result == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

fn walk_values_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    values: &mut Vec<Value>,
    ctl: &mut MutationControl,
) -> VisitResult {
    let mut index = 0;
    while index < values.len() {
        ctl.push_slot(Slot::Value);
        let result = walk_value_mut(visitor, &mut values[index], ctl);
        ctl.pop_slot();

        index = match ctl.take_edit() {
            None => index + 1,
            Some(Edit::Remove) => {
                values.remove(index);
                index
            }
            Some(Edit::ReplaceValues {
                values: replacements,
                visit,
            }) => {
                let count = replacements.len();
                values.splice(index..=index, replacements);
                if visit {
                    index
                } else {
                    index + count
                }
            }
            Some(Edit::ReplaceNodes { .. }) => panic!("a value cannot be replaced with nodes"),
        };

        if result == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Walk a list whose elements can only be removed.
fn walk_items_mut<V, T>(
    visitor: &mut V,
    items: &mut Vec<T>,
    ctl: &mut MutationControl,
    walk: fn(&mut V, &mut T, &mut MutationControl) -> VisitResult,
) -> VisitResult
where
    V: MutatingVisitor + ?Sized,
{
    let mut index = 0;
    while index < items.len() {
        ctl.push_slot(Slot::ListItem);
        let result = walk(visitor, &mut items[index], ctl);
        ctl.pop_slot();

        index = match ctl.take_edit() {
            None => index + 1,
            Some(Edit::Remove) => {
                items.remove(index);
                index
            }
            Some(_) => panic!("elements of this list can only be removed"),
        };

        if result == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

// ============================================================================
// Structure
// ============================================================================

pub fn walk_tree_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut CssTree,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_tree(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Tree, |ctl| {
                if let Some(charset) = node.charset.as_mut() {
                    if walk_charset_mut(visitor, charset, ctl) == VisitResult::Stop {
                        return VisitResult::Stop;
                    }
                }
                walk_items_mut(visitor, &mut node.imports, ctl, walk_import_rule_mut::<V>)
                    .and_then(|| walk_block_mut(visitor, &mut node.body, ctl))
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_tree(node, ctl);
    left(ctl)
}

pub fn walk_block_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut Block,
    ctl: &mut MutationControl,
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
            let result = descend(ctl, kind, |ctl| {
                walk_nodes_mut(visitor, &mut node.children, ctl)
            });
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

pub fn walk_node_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut Node,
    ctl: &mut MutationControl,
) -> VisitResult {
    match node {
        Node::Ruleset(n) => walk_ruleset_mut(visitor, n, ctl),
        Node::Declaration(n) => walk_declaration_mut(visitor, n, ctl),
        Node::UnknownAtRule(n) => walk_unknown_at_rule_mut(visitor, n, ctl),
        Node::Media(n) => walk_media_rule_mut(visitor, n, ctl),
        Node::Page(n) => walk_page_rule_mut(visitor, n, ctl),
        Node::PageSelector(n) => walk_page_selector_mut(visitor, n, ctl),
        Node::FontFace(n) => walk_font_face_mut(visitor, n, ctl),
        Node::CharSet(n) => walk_charset_mut(visitor, n, ctl),
        Node::Import(n) => walk_import_rule_mut(visitor, n, ctl),
        Node::Definition(n) => walk_definition_mut(visitor, n, ctl),
        Node::ConditionalBlock(n) => walk_conditional_block_mut(visitor, n, ctl),
    }
}

pub fn walk_ruleset_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut Ruleset,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_ruleset(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Ruleset, |ctl| {
                walk_items_mut(visitor, &mut node.selectors, ctl, walk_selector_mut::<V>)
                    .and_then(|| walk_block_mut(visitor, &mut node.block, ctl))
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_ruleset(node, ctl);
    left(ctl)
}

pub fn walk_selector_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut Selector,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_selector(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Selector, |ctl| {
                walk_items_mut(visitor, &mut node.refiners, ctl, walk_refiner_mut::<V>).and_then(
                    || match node.combinator.as_deref_mut() {
                        Some(combinator) => walk_combinator_mut(visitor, combinator, ctl),
                        None => VisitResult::Continue,
                    },
                )
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_selector(node, ctl);
    left(ctl)
}

pub fn walk_refiner_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut Refiner,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_refiner(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        _ => {}
    }
    visitor.leave_refiner(node, ctl);
    left(ctl)
}

pub fn walk_combinator_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut Combinator,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_combinator(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Combinator, |ctl| {
                walk_selector_mut(visitor, &mut node.selector, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_combinator(node, ctl);
    left(ctl)
}

pub fn walk_declaration_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut Declaration,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_declaration(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Declaration, |ctl| {
                walk_values_mut(visitor, &mut node.values, ctl)
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

pub fn walk_unknown_at_rule_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut UnknownAtRule,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_unknown_at_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::UnknownAtRule, |ctl| {
                walk_values_mut(visitor, &mut node.parameters, ctl).and_then(|| {
                    match node.block.as_mut() {
                        Some(block) => walk_block_mut(visitor, block, ctl),
                        None => VisitResult::Continue,
                    }
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

pub fn walk_media_rule_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut MediaRule,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_media_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Media, |ctl| {
                walk_values_mut(visitor, &mut node.parameters, ctl)
                    .and_then(|| walk_block_mut(visitor, &mut node.block, ctl))
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_media_rule(node, ctl);
    left(ctl)
}

pub fn walk_page_rule_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut PageRule,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_page_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Page, |ctl| {
                walk_values_mut(visitor, &mut node.parameters, ctl)
                    .and_then(|| walk_block_mut(visitor, &mut node.block, ctl))
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_page_rule(node, ctl);
    left(ctl)
}

pub fn walk_page_selector_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut PageSelector,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_page_selector(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::PageSelector, |ctl| {
                walk_block_mut(visitor, &mut node.block, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_page_selector(node, ctl);
    left(ctl)
}

pub fn walk_font_face_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut FontFace,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_font_face(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::FontFace, |ctl| {
                walk_block_mut(visitor, &mut node.block, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_font_face(node, ctl);
    left(ctl)
}

pub fn walk_charset_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut CharSet,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_charset(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::CharSet, |ctl| {
                walk_values_mut(visitor, &mut node.parameters, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_charset(node, ctl);
    left(ctl)
}

pub fn walk_import_rule_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut ImportRule,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_import_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Import, |ctl| {
                walk_values_mut(visitor, &mut node.parameters, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_import_rule(node, ctl);
    left(ctl)
}

pub fn walk_definition_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut Definition,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_definition(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::Definition, |ctl| {
                walk_values_mut(visitor, &mut node.values, ctl)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_definition(node, ctl);
    left(ctl)
}

pub fn walk_conditional_block_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut ConditionalBlock,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_conditional_block(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::ConditionalBlock, |ctl| {
                walk_items_mut(visitor, &mut node.rules, ctl, walk_conditional_rule_mut::<V>)
            });
            if result == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_conditional_block(node, ctl);
    left(ctl)
}

pub fn walk_conditional_rule_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut ConditionalRule,
    ctl: &mut MutationControl,
) -> VisitResult {
    match entered(visitor.enter_conditional_rule(node, ctl), ctl) {
        VisitResult::Stop => return VisitResult::Stop,
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let result = descend(ctl, NodeKind::ConditionalRule, |ctl| {
                walk_values_mut(visitor, &mut node.parameters, ctl)
                    .and_then(|| walk_block_mut(visitor, &mut node.block, ctl))
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

pub fn walk_value_mut<V: MutatingVisitor + ?Sized>(
    visitor: &mut V,
    node: &mut Value,
    ctl: &mut MutationControl,
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
        _ if ctl.has_pending_edit() => return left(ctl),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let children = match node {
                Value::Composite(v) => Some(&mut v.values),
                Value::Function(v) => Some(&mut v.arguments),
                _ => None,
            };
            if let Some(children) = children {
                let result = descend(ctl, NodeKind::Value, |ctl| {
                    walk_values_mut(visitor, children, ctl)
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
