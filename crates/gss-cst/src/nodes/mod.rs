// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Stylesheet tree node types.
//!
//! Every node exclusively owns its children; there are no parent pointers.
//! Traversal code that needs to know where a node sits asks the visit
//! control for its ancestors instead.

pub mod at_rules;
pub mod rules;
pub mod tree;
pub mod values;

pub use at_rules::{
    AtRuleType, CharSet, ConditionalBlock, ConditionalKind, ConditionalRule, Definition,
    FontFace, ImportRule, MediaRule, PageRule, PageSelector, UnknownAtRule, PAGE_MARGIN_BOXES,
};
pub use rules::{
    Combinator, CombinatorKind, Declaration, Refiner, RefinerKind, Ruleset, Selector,
};
pub use tree::{Block, BlockKind, CssTree, Node, NodeKind};
pub use values::{
    is_constant_name, BooleanExpression, CompositeOperator, CompositeValue, ConstantReference,
    FunctionValue, Literal, Numeric, Priority, Quote, StringValue, Value,
};
