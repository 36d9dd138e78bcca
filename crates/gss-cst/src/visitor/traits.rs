// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for stylesheet traversal.

use crate::nodes::{
    BooleanExpression, Block, CharSet, Combinator, CompositeValue, ConditionalBlock,
    ConditionalRule, ConstantReference, CssTree, Declaration, Definition, FontFace,
    FunctionValue, ImportRule, Literal, MediaRule, Numeric, PageRule, PageSelector, Priority,
    Refiner, Ruleset, Selector, StringValue, UnknownAtRule,
};

use super::control::{MutationControl, VisitControl};

/// Result of entering a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `enter_*` or `leave_*` methods will be called.
    Stop,
}

impl VisitResult {
    /// Run `next` unless traversal has stopped.
    pub(crate) fn and_then(self, next: impl FnOnce() -> VisitResult) -> VisitResult {
        match self {
            VisitResult::Stop => VisitResult::Stop,
            _ => next(),
        }
    }
}

/// Macro to generate read-only visitor method signatures.
///
/// This macro generates pairs of `enter_*` and `leave_*` methods with default
/// implementations that return `VisitResult::Continue` and do nothing.
///
/// # Usage
///
/// ```ignore
/// visitor_methods! {
///     // Generates enter_ruleset and leave_ruleset for Ruleset
///     ruleset: Ruleset,
/// }
/// ```
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Enter a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
                #[allow(unused_variables)]
                fn [<enter_ $base_name>](&mut self, node: &$node_type, ctl: &mut VisitControl) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$node_type, ctl: &mut VisitControl) {}
            )*
        }
    };
}

/// Macro to generate mutating visitor method signatures.
///
/// Same shape as [`visitor_methods!`], but nodes are passed mutably together
/// with the [`MutationControl`] used to request structural edits.
macro_rules! mutating_visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Enter a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Requesting a removal or replacement here skips the children and `leave_*`."]
                #[allow(unused_variables)]
                fn [<enter_ $base_name>](&mut self, node: &mut $node_type, ctl: &mut MutationControl) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &mut $node_type, ctl: &mut MutationControl) {}
            )*
        }
    };
}

/// Read-only visitor for stylesheet traversal.
///
/// # Traversal Order
///
/// - `enter_*` is called in **pre-order** (before children)
/// - `leave_*` is called in **post-order** (after children)
/// - Children are visited in document order; the root visits its charset,
///   then its imports, then its body
///
/// # Control Flow
///
/// - Return `VisitResult::Continue` to traverse into children
/// - Return `VisitResult::SkipChildren` to skip children (but `leave_*` still called)
/// - Return `VisitResult::Stop`, or call [`VisitControl::stop_visit`], to
///   halt traversal immediately
///
/// # Example
///
/// ```ignore
/// use gss_cst::visitor::{Visitor, VisitControl, VisitResult};
/// use gss_cst::nodes::Refiner;
///
/// struct ClassCollector {
///     classes: Vec<String>,
/// }
///
/// impl Visitor for ClassCollector {
///     fn enter_refiner(&mut self, node: &Refiner, _ctl: &mut VisitControl) -> VisitResult {
///         self.classes.push(node.name.clone());
///         VisitResult::Continue
///     }
/// }
/// ```
pub trait Visitor {
    // Structure
    visitor_methods! {
        tree: CssTree,
        block: Block,
        declaration_block: Block,
        ruleset: Ruleset,
        selector: Selector,
        refiner: Refiner,
        combinator: Combinator,
        declaration: Declaration,
    }

    // At-rules
    visitor_methods! {
        unknown_at_rule: UnknownAtRule,
        media_rule: MediaRule,
        page_rule: PageRule,
        page_selector: PageSelector,
        font_face: FontFace,
        charset: CharSet,
        import_rule: ImportRule,
        definition: Definition,
        conditional_block: ConditionalBlock,
        conditional_rule: ConditionalRule,
    }

    // Values
    visitor_methods! {
        literal: Literal,
        string: StringValue,
        numeric: Numeric,
        composite: CompositeValue,
        function: FunctionValue,
        priority: Priority,
        boolean_expression: BooleanExpression,
        constant_reference: ConstantReference,
    }
}

/// Mutating visitor driven by the mutating visit controller.
///
/// Hooks receive the node mutably and may change its fields in place. To
/// change the structure around the current node (remove it, or replace it
/// with a list of nodes) a hook asks the [`MutationControl`]; the controller
/// applies the edit once the hook returns and keeps iterating over the
/// edited list.
pub trait MutatingVisitor {
    // Structure
    mutating_visitor_methods! {
        tree: CssTree,
        block: Block,
        declaration_block: Block,
        ruleset: Ruleset,
        selector: Selector,
        refiner: Refiner,
        combinator: Combinator,
        declaration: Declaration,
    }

    // At-rules
    mutating_visitor_methods! {
        unknown_at_rule: UnknownAtRule,
        media_rule: MediaRule,
        page_rule: PageRule,
        page_selector: PageSelector,
        font_face: FontFace,
        charset: CharSet,
        import_rule: ImportRule,
        definition: Definition,
        conditional_block: ConditionalBlock,
        conditional_rule: ConditionalRule,
    }

    // Values
    mutating_visitor_methods! {
        literal: Literal,
        string: StringValue,
        numeric: Numeric,
        composite: CompositeValue,
        function: FunctionValue,
        priority: Priority,
        boolean_expression: BooleanExpression,
        constant_reference: ConstantReference,
    }
}
