// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Traversal state handed to visitor hooks.
//!
//! [`VisitControl`] answers "where am I" questions (the kinds of the
//! enclosing nodes) and lets a hook stop the whole traversal.
//! [`MutationControl`] adds structural edits of the current node for the
//! mutating walk.

use crate::nodes::{Node, NodeKind, Value};

// ============================================================================
// Read-only control
// ============================================================================

/// State shared between the walker and the hooks of a read-only visit.
#[derive(Debug, Default)]
pub struct VisitControl {
    stopped: bool,
    ancestors: Vec<NodeKind>,
}

impl VisitControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the traversal. No further hooks are called once the current one
    /// returns.
    pub fn stop_visit(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Kinds of the nodes enclosing the current one, outermost first.
    pub fn enclosing(&self) -> &[NodeKind] {
        &self.ancestors
    }

    /// Kind of the node whose child is being visited.
    pub fn parent_kind(&self) -> Option<NodeKind> {
        self.ancestors.last().copied()
    }

    /// Number of enclosing nodes. The root itself is at depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// True when the current node is a direct child of the root body.
    pub fn is_top_level(&self) -> bool {
        self.ancestors == [NodeKind::Tree, NodeKind::Block]
    }

    /// True if any enclosing node has the given kind.
    pub fn is_inside(&self, kind: NodeKind) -> bool {
        self.ancestors.contains(&kind)
    }

    pub(crate) fn push(&mut self, kind: NodeKind) {
        self.ancestors.push(kind);
    }

    pub(crate) fn pop(&mut self) {
        self.ancestors.pop();
    }
}

// ============================================================================
// Mutating control
// ============================================================================

/// Where the current node of a mutating walk lives in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// An element of a block's child list.
    BlockChild,
    /// An element of a value list: declaration values, at-rule parameters,
    /// function arguments or composite parts.
    Value,
    /// An element of some other list: imports, selectors, refiners,
    /// conditional rules.
    ListItem,
    /// A single-valued field, or the root.
    Fixed,
}

/// A structural edit of the current node, applied by the walker once the
/// requesting hook returns.
pub(crate) enum Edit {
    Remove,
    ReplaceNodes { nodes: Vec<Node>, visit: bool },
    ReplaceValues { values: Vec<Value>, visit: bool },
}

type SiblingEdit = Box<dyn FnOnce(&mut Node)>;

/// State shared between the walker and the hooks of a mutating visit.
///
/// At most one structural edit can be requested per node. Requesting an edit
/// the current position does not allow (removing the root, replacing a value
/// with block children) is a programming error and panics.
#[derive(Default)]
pub struct MutationControl {
    base: VisitControl,
    slots: Vec<Slot>,
    edit: Option<Edit>,
    sibling_edit: Option<SiblingEdit>,
}

impl MutationControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_visit(&mut self) {
        self.base.stop_visit();
    }

    pub fn is_stopped(&self) -> bool {
        self.base.is_stopped()
    }

    pub fn enclosing(&self) -> &[NodeKind] {
        self.base.enclosing()
    }

    pub fn parent_kind(&self) -> Option<NodeKind> {
        self.base.parent_kind()
    }

    pub fn depth(&self) -> usize {
        self.base.depth()
    }

    pub fn is_top_level(&self) -> bool {
        self.base.is_top_level()
    }

    pub fn is_inside(&self, kind: NodeKind) -> bool {
        self.base.is_inside(kind)
    }

    /// Remove the current node from its list.
    ///
    /// # Panics
    /// Panics if the current node is not a list element.
    pub fn remove_current_node(&mut self) {
        match self.current_slot() {
            Slot::BlockChild | Slot::Value | Slot::ListItem => self.request(Edit::Remove),
            Slot::Fixed => panic!("the current node is not a list element and cannot be removed"),
        }
    }

    /// Replace the current block child with `nodes`.
    ///
    /// With `visit_replacements` the new nodes are visited next; otherwise
    /// the walk continues after them.
    ///
    /// # Panics
    /// Panics if the current node is not a block child.
    pub fn replace_current_block_child_with(&mut self, nodes: Vec<Node>, visit_replacements: bool) {
        assert!(
            self.current_slot() == Slot::BlockChild,
            "the current node is not a block child"
        );
        self.request(Edit::ReplaceNodes {
            nodes,
            visit: visit_replacements,
        });
    }

    /// Replace the current value with `values`.
    ///
    /// # Panics
    /// Panics if the current node is not an element of a value list.
    pub fn replace_current_value_with(&mut self, values: Vec<Value>, visit_replacements: bool) {
        assert!(
            self.current_slot() == Slot::Value,
            "the current node is not an element of a value list"
        );
        self.request(Edit::ReplaceValues {
            values,
            visit: visit_replacements,
        });
    }

    /// Edit the block child just before the current one, once the current
    /// node's hooks have run.
    ///
    /// # Panics
    /// Panics if the current node is not a block child, if an edit was
    /// already requested, or (when applied) if there is no previous sibling.
    pub fn update_previous_sibling(&mut self, edit: impl FnOnce(&mut Node) + 'static) {
        assert!(
            self.current_slot() == Slot::BlockChild,
            "the current node is not a block child"
        );
        assert!(
            self.sibling_edit.is_none(),
            "the previous sibling already has a pending edit"
        );
        self.sibling_edit = Some(Box::new(edit));
    }

    /// True once a structural edit of the current node has been requested.
    pub fn has_pending_edit(&self) -> bool {
        self.edit.is_some()
    }

    fn current_slot(&self) -> Slot {
        self.slots.last().copied().unwrap_or(Slot::Fixed)
    }

    fn request(&mut self, edit: Edit) {
        assert!(
            self.edit.is_none(),
            "a structural edit was already requested for the current node"
        );
        self.edit = Some(edit);
    }

    pub(crate) fn push(&mut self, kind: NodeKind) {
        self.base.push(kind);
    }

    pub(crate) fn pop(&mut self) {
        self.base.pop();
    }

    pub(crate) fn push_slot(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub(crate) fn pop_slot(&mut self) {
        self.slots.pop();
    }

    pub(crate) fn take_edit(&mut self) -> Option<Edit> {
        self.edit.take()
    }

    pub(crate) fn take_sibling_edit(&mut self) -> Option<SiblingEdit> {
        self.sibling_edit.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_answer_position_queries() {
        let mut ctl = VisitControl::new();
        assert_eq!(ctl.depth(), 0);
        ctl.push(NodeKind::Tree);
        ctl.push(NodeKind::Block);
        assert!(ctl.is_top_level());
        ctl.push(NodeKind::Media);
        assert!(!ctl.is_top_level());
        assert!(ctl.is_inside(NodeKind::Tree));
        assert_eq!(ctl.parent_kind(), Some(NodeKind::Media));
        ctl.pop();
        assert_eq!(ctl.parent_kind(), Some(NodeKind::Block));
    }

    #[test]
    #[should_panic(expected = "cannot be removed")]
    fn removing_a_fixed_node_panics() {
        let mut ctl = MutationControl::new();
        ctl.remove_current_node();
    }

    #[test]
    #[should_panic(expected = "already requested")]
    fn double_edit_panics() {
        let mut ctl = MutationControl::new();
        ctl.push_slot(Slot::BlockChild);
        ctl.remove_current_node();
        ctl.replace_current_block_child_with(Vec::new(), false);
    }

    #[test]
    #[should_panic(expected = "not an element of a value list")]
    fn value_replacement_needs_value_slot() {
        let mut ctl = MutationControl::new();
        ctl.push_slot(Slot::BlockChild);
        ctl.replace_current_value_with(Vec::new(), false);
    }
}
